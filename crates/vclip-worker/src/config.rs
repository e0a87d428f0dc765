//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use vclip_models::SmoothingStrength;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Streams processed at the same time (worker slots)
    pub max_workers: usize,
    /// Streams admitted at once, running or waiting for a slot.
    /// Submissions beyond this are rejected immediately.
    pub max_concurrent_streams: usize,
    /// How long terminal statuses are kept before cleanup
    pub status_retention: Duration,
    /// Preset used when a job does not name one
    pub default_smoothing: SmoothingStrength,
    /// Directory for JSONL output when a job has no explicit path
    pub output_dir: PathBuf,
    /// Frames between status progress updates
    pub progress_interval_frames: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            max_concurrent_streams: 10,
            status_retention: Duration::from_secs(24 * 3600),
            default_smoothing: SmoothingStrength::Medium,
            output_dir: PathBuf::from("/tmp/vclip-reframe"),
            progress_interval_frames: 30,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_workers: std::env::var("REFRAME_MAX_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(4),
            max_concurrent_streams: std::env::var("REFRAME_MAX_CONCURRENT_STREAMS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(10),
            status_retention: Duration::from_secs(
                std::env::var("REFRAME_STATUS_RETENTION_HOURS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(24)
                    * 3600,
            ),
            default_smoothing: std::env::var("REFRAME_SMOOTHING")
                .map(|s| SmoothingStrength::parse_or_default(&s))
                .unwrap_or_default(),
            output_dir: std::env::var("REFRAME_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/vclip-reframe")),
            progress_interval_frames: std::env::var("REFRAME_PROGRESS_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u64| n > 0)
                .unwrap_or(30),
        }
    }

    /// Builder-style concurrency override.
    pub fn with_limits(mut self, max_workers: usize, max_concurrent_streams: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self.max_concurrent_streams = max_concurrent_streams.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.max_concurrent_streams, 10);
        assert_eq!(config.status_retention, Duration::from_secs(86_400));
        assert_eq!(config.default_smoothing, SmoothingStrength::Medium);
    }

    #[test]
    fn test_with_limits_keeps_at_least_one_slot() {
        let config = WorkerConfig::default().with_limits(0, 0);
        assert_eq!(config.max_workers, 1);
        assert_eq!(config.max_concurrent_streams, 1);
    }
}
