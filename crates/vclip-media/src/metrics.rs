//! Prometheus metrics for reframing.
//!
//! Recording is a no-op until a recorder is installed (see the worker's
//! `init_metrics`).

use metrics::{counter, gauge, histogram};
use vclip_models::FramingMode;

/// Metric names as constants for consistency.
pub mod names {
    // Engine metrics
    pub const FRAMES_TOTAL: &str = "vclip_reframe_frames_total";
    pub const SCENE_RESETS_TOTAL: &str = "vclip_reframe_scene_resets_total";
    pub const DUAL_FRAMES_TOTAL: &str = "vclip_reframe_dual_frames_total";

    // Stream metrics
    pub const STREAMS_ACTIVE: &str = "vclip_reframe_streams_active";
    pub const STREAMS_REJECTED_TOTAL: &str = "vclip_reframe_streams_rejected_total";
    pub const STREAM_DURATION_SECONDS: &str = "vclip_reframe_stream_duration_seconds";
}

/// Record a processed frame.
pub fn record_frame(mode: FramingMode) {
    let labels = [("mode", mode.as_str().to_string())];
    counter!(names::FRAMES_TOTAL, &labels).increment(1);
    if mode == FramingMode::DualSpeaker {
        counter!(names::DUAL_FRAMES_TOTAL).increment(1);
    }
}

/// Record a confirmed scene reset.
pub fn record_scene_reset() {
    counter!(names::SCENE_RESETS_TOTAL).increment(1);
}

/// Update the active streams gauge.
pub fn set_active_streams(count: usize) {
    gauge!(names::STREAMS_ACTIVE).set(count as f64);
}

/// Record a stream rejected at admission.
pub fn record_stream_rejected() {
    counter!(names::STREAMS_REJECTED_TOTAL).increment(1);
}

/// Record how long a stream took end to end.
pub fn record_stream_duration(state: &str, duration_secs: f64) {
    let labels = [("state", state.to_string())];
    histogram!(names::STREAM_DURATION_SECONDS, &labels).record(duration_secs);
}
