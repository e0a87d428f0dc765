//! Structured stream lifecycle events.
//!
//! Every event carries the stream id and frame counters as fields, so JSON
//! logs can be filtered and aggregated per stream.

use std::time::Duration;

use tracing::{error, info, warn, Span};
use vclip_media::StreamSummary;
use vclip_models::StreamId;

use crate::error::WorkerError;

/// Lifecycle logger for one admitted stream.
#[derive(Debug, Clone)]
pub struct StreamLogger {
    stream_id: StreamId,
    total_frames: u64,
}

impl StreamLogger {
    pub fn new(stream_id: &StreamId, total_frames: u64) -> Self {
        Self {
            stream_id: stream_id.clone(),
            total_frames,
        }
    }

    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    /// Share of submitted frames processed so far, 0-100.
    pub fn percent_done(&self, frames_processed: u64) -> f64 {
        if self.total_frames == 0 {
            return 100.0;
        }
        (frames_processed.min(self.total_frames) as f64 / self.total_frames as f64) * 100.0
    }

    pub fn admitted(&self, frame_width: u32, frame_height: u32) {
        info!(
            stream_id = %self.stream_id,
            total_frames = self.total_frames,
            frame_width,
            frame_height,
            "Stream admitted"
        );
    }

    pub fn progress(&self, summary: &StreamSummary) {
        info!(
            stream_id = %self.stream_id,
            frames = summary.frames_processed,
            total_frames = self.total_frames,
            percent = format_args!("{:.1}", self.percent_done(summary.frames_processed)),
            resets = summary.scene_resets,
            dual_frames = summary.dual_frames,
            "Stream progress"
        );
    }

    pub fn completed(&self, summary: &StreamSummary, elapsed: Duration) {
        info!(
            stream_id = %self.stream_id,
            frames = summary.frames_processed,
            resets = summary.scene_resets,
            dual_frames = summary.dual_frames,
            fallback_frames = summary.fallback_frames,
            elapsed_ms = elapsed.as_millis() as u64,
            "Stream completed"
        );
    }

    pub fn cancelled(&self, elapsed: Duration) {
        warn!(
            stream_id = %self.stream_id,
            total_frames = self.total_frames,
            elapsed_ms = elapsed.as_millis() as u64,
            "Stream cancelled"
        );
    }

    pub fn failed(&self, err: &WorkerError, elapsed: Duration) {
        error!(
            stream_id = %self.stream_id,
            total_frames = self.total_frames,
            elapsed_ms = elapsed.as_millis() as u64,
            "Stream failed: {}", err
        );
    }

    /// Span for the stream task; engine events inside it inherit the id.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "stream",
            stream_id = %self.stream_id,
            total_frames = self.total_frames
        )
    }
}
