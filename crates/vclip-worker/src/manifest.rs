//! Batch job manifests.
//!
//! A manifest carries everything the engine needs for one stream: source
//! frame size, framing options, scene spans and per-frame detections.
//! Results are written as JSON Lines, one [`FrameReport`] per line.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use vclip_media::ReframeConfig;
use vclip_models::{FrameInput, FrameReport, SceneContext, SceneSpan, SmoothingStrength, TargetSize};

use crate::error::{WorkerError, WorkerResult};
use crate::pool::StreamRequest;

fn default_true() -> bool {
    true
}

fn default_micro_cut_threshold() -> u64 {
    10
}

/// One reframing job.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReframeJob {
    /// Source frame width in pixels
    pub frame_width: u32,
    /// Source frame height in pixels
    pub frame_height: u32,

    /// Smoothing preset; the worker default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<SmoothingStrength>,

    /// Output size; 9:16 at the source height when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSize>,

    #[serde(default)]
    pub dual_mode_enabled: bool,

    #[serde(default = "default_true")]
    pub ignore_micro_cuts: bool,

    #[serde(default = "default_micro_cut_threshold")]
    pub micro_cut_threshold_frames: u64,

    /// Ordered scene list from the cut detector
    #[serde(default)]
    pub scenes: Vec<SceneSpan>,

    #[serde(default)]
    pub frames: Vec<FrameInput>,

    /// JSONL output path; defaults to the worker output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl ReframeJob {
    pub fn from_json(json: &str) -> WorkerResult<Self> {
        let job: ReframeJob = serde_json::from_str(json)?;
        job.validate()?;
        Ok(job)
    }

    /// Read and validate a manifest file.
    pub async fn load(path: &Path) -> WorkerResult<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// JSON Schema for manifests.
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReframeJob)
    }

    /// Check fields serde cannot enforce.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(WorkerError::invalid_manifest(format!(
                "frame size {}x{} must be non-zero",
                self.frame_width, self.frame_height
            )));
        }
        if let Some(target) = self.target {
            TargetSize::new(target.width, target.height)?;
        }
        for span in &self.scenes {
            SceneSpan::new(span.start_frame, span.end_frame)?;
        }
        for face in self.frames.iter().flat_map(|f| f.faces.iter()) {
            face.validate()?;
        }
        Ok(())
    }

    pub fn reframe_config(&self, default_smoothing: SmoothingStrength) -> ReframeConfig {
        let strength = self.smoothing.unwrap_or(default_smoothing);
        ReframeConfig {
            smoothing: strength.config(),
            target: self
                .target
                .unwrap_or_else(|| TargetSize::vertical_for_height(self.frame_height)),
            ignore_micro_cuts: self.ignore_micro_cuts,
            micro_cut_threshold_frames: self.micro_cut_threshold_frames,
            dual_mode_enabled: self.dual_mode_enabled,
            ..Default::default()
        }
    }

    pub fn scene_context(&self) -> SceneContext {
        SceneContext::from_spans(&self.scenes)
    }

    /// Convert into a pool request.
    pub fn into_request(self, default_smoothing: SmoothingStrength) -> StreamRequest {
        StreamRequest {
            config: self.reframe_config(default_smoothing),
            scenes: self.scene_context(),
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            frames: self.frames,
        }
    }
}

/// Write reports as JSON Lines, creating parent directories as needed.
pub async fn write_reports(path: &Path, reports: &[FrameReport]) -> WorkerResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut buf = Vec::with_capacity(reports.len() * 160);
    for report in reports {
        serde_json::to_writer(&mut buf, report)?;
        buf.push(b'\n');
    }

    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(&buf).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::FaceBox;

    const MANIFEST: &str = r#"{
        "frame_width": 1920,
        "frame_height": 1080,
        "smoothing": "high",
        "dual_mode_enabled": true,
        "scenes": [
            {"start_frame": 0, "end_frame": 100},
            {"start_frame": 100, "end_frame": 250}
        ],
        "frames": [
            {"frame_index": 0, "faces": [{"x0": 900, "y0": 400, "x1": 1100, "y1": 700}], "voice_active": true},
            {"frame_index": 1},
            {"frame_index": 2, "faces": []}
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let job = ReframeJob::from_json(MANIFEST).unwrap();
        assert_eq!(job.smoothing, Some(SmoothingStrength::High));
        assert!(job.ignore_micro_cuts);
        assert_eq!(job.micro_cut_threshold_frames, 10);
        assert_eq!(job.frames.len(), 3);
        assert!(job.frames[1].faces.is_empty());
        assert_eq!(job.frames[0].voice_active, Some(true));

        let scenes = job.scene_context();
        assert_eq!(scenes.cut_boundaries(), vec![100]);
    }

    #[test]
    fn test_config_defaults() {
        let job = ReframeJob::from_json(r#"{"frame_width": 1280, "frame_height": 720}"#).unwrap();
        let config = job.reframe_config(SmoothingStrength::Low);
        assert_eq!(config.smoothing, SmoothingStrength::Low.config());
        assert_eq!(config.target, TargetSize::new(406, 720).unwrap());
        assert!(!config.dual_mode_enabled);
    }

    #[test]
    fn test_rejects_invalid_manifests() {
        assert!(ReframeJob::from_json(r#"{"frame_width": 0, "frame_height": 720}"#).is_err());
        assert!(ReframeJob::from_json(
            r#"{"frame_width": 10, "frame_height": 10, "scenes": [{"start_frame": 5, "end_frame": 2}]}"#
        )
        .is_err());
        assert!(ReframeJob::from_json(r#"{"frame_width": 10}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let job = tokio_test::block_on(ReframeJob::load(&path)).unwrap();
        assert_eq!(job.frames.len(), 3);
        assert!(job.dual_mode_enabled);
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = serde_json::to_value(ReframeJob::schema()).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("frame_width")));
        assert!(required.contains(&serde_json::json!("frame_height")));
    }

    #[tokio::test]
    async fn test_write_reports_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.jsonl");

        let job = ReframeJob {
            frame_width: 1920,
            frame_height: 1080,
            smoothing: None,
            target: None,
            dual_mode_enabled: false,
            ignore_micro_cuts: true,
            micro_cut_threshold_frames: 10,
            scenes: Vec::new(),
            frames: vec![FrameInput::new(0, vec![FaceBox::new(900.0, 400.0, 1100.0, 700.0)], None)],
            output: None,
        };
        let request = job.into_request(SmoothingStrength::Medium);
        let mut engine = vclip_media::ReframingEngine::new(request.config, request.scenes).unwrap();
        let reports = engine
            .process_all(&request.frames, request.frame_width, request.frame_height)
            .unwrap();

        write_reports(&path, &reports).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1);
        let parsed: FrameReport = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, reports[0]);
    }
}
