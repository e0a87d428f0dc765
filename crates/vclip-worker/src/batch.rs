//! Batch runs over manifest files.
//!
//! Submissions are kept within the pool's admission limit: once that many
//! jobs are in flight, the oldest one is awaited before the next manifest is
//! submitted. A batch larger than the limit therefore queues instead of
//! being rejected.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::{error, info};
use vclip_models::SmoothingStrength;

use crate::error::WorkerResult;
use crate::manifest::{write_reports, ReframeJob};
use crate::pool::{StreamPool, StreamTicket};

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub completed: usize,
    pub failed: usize,
}

struct PendingJob {
    ticket: StreamTicket,
    output: PathBuf,
}

/// Run every manifest through `pool`, writing one JSONL file per job.
pub async fn run_batch(pool: &StreamPool, manifests: &[PathBuf]) -> BatchReport {
    let default_smoothing = pool.config().default_smoothing;
    let limit = pool.config().max_concurrent_streams.max(1);
    let mut pending: VecDeque<PendingJob> = VecDeque::with_capacity(limit);
    let mut report = BatchReport::default();

    for path in manifests {
        if pending.len() >= limit {
            if let Some(job) = pending.pop_front() {
                report.record(finish_job(job).await);
            }
        }

        match submit_manifest(pool, path, default_smoothing).await {
            Ok(job) => pending.push_back(job),
            Err(e) => {
                error!(manifest = %path.display(), "Job not started: {}", e);
                report.failed += 1;
            }
        }
    }

    while let Some(job) = pending.pop_front() {
        report.record(finish_job(job).await);
    }

    let cleaned = pool.cleanup_completed().await;
    if cleaned > 0 {
        info!(cleaned, "Dropped expired stream statuses");
    }

    report
}

impl BatchReport {
    fn record(&mut self, ok: bool) {
        if ok {
            self.completed += 1;
        } else {
            self.failed += 1;
        }
    }
}

async fn submit_manifest(
    pool: &StreamPool,
    path: &Path,
    default_smoothing: SmoothingStrength,
) -> WorkerResult<PendingJob> {
    let job = ReframeJob::load(path).await?;

    let output = job.output.clone().unwrap_or_else(|| {
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        pool.config().output_dir.join(format!("{stem}.jsonl"))
    });

    let ticket = pool.submit(job.into_request(default_smoothing)).await?;
    info!(stream_id = %ticket.stream_id, manifest = %path.display(), "Submitted job");
    Ok(PendingJob { ticket, output })
}

async fn finish_job(job: PendingJob) -> bool {
    let stream_id = job.ticket.stream_id.clone();
    let result = async {
        let outcome = job.ticket.wait().await?;
        write_reports(&job.output, &outcome.reports).await?;
        WorkerResult::Ok(outcome.summary)
    }
    .await;

    match result {
        Ok(summary) => {
            info!(
                stream_id = %stream_id,
                output = %job.output.display(),
                frames = summary.frames_processed,
                resets = summary.scene_resets,
                "Wrote frame reports"
            );
            true
        }
        Err(e) => {
            error!(stream_id = %stream_id, "Job failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkerConfig;

    const MANIFEST: &str = r#"{
        "frame_width": 1920,
        "frame_height": 1080,
        "frames": [
            {"frame_index": 0, "faces": [{"x0": 900, "y0": 400, "x1": 1100, "y1": 700}]},
            {"frame_index": 1, "faces": [{"x0": 910, "y0": 400, "x1": 1110, "y1": 700}]}
        ]
    }"#;

    fn pool_with_output(max_streams: usize, output_dir: &Path) -> StreamPool {
        let mut config = WorkerConfig::default().with_limits(1, max_streams);
        config.output_dir = output_dir.to_path_buf();
        StreamPool::new(config)
    }

    #[tokio::test]
    async fn test_batch_larger_than_admission_limit_completes() {
        let dir = tempfile::tempdir().unwrap();
        let manifests: Vec<PathBuf> = (0..5)
            .map(|i| {
                let path = dir.path().join(format!("job{i}.json"));
                std::fs::write(&path, MANIFEST).unwrap();
                path
            })
            .collect();

        let out = dir.path().join("out");
        let pool = pool_with_output(2, &out);
        let report = run_batch(&pool, &manifests).await;

        assert_eq!(report, BatchReport { completed: 5, failed: 0 });
        for i in 0..5 {
            let written = std::fs::read_to_string(out.join(format!("job{i}.jsonl"))).unwrap();
            assert_eq!(written.lines().count(), 2);
        }
        assert_eq!(pool.active_streams(), 0);
    }

    #[tokio::test]
    async fn test_bad_manifest_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, MANIFEST).unwrap();
        std::fs::write(&bad, r#"{"frame_width": 0, "frame_height": 1080}"#).unwrap();

        let pool = pool_with_output(1, &dir.path().join("out"));
        let report = run_batch(&pool, &[bad, good]).await;

        assert_eq!(report, BatchReport { completed: 1, failed: 1 });
    }
}
