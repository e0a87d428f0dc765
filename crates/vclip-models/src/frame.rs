//! Per-frame engine inputs and outputs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crop::{CropResult, FramingMode};
use crate::geometry::{FaceBox, FramePoint};

/// Everything the engine needs to know about one source frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameInput {
    pub frame_index: u64,
    /// Detected faces, in detector order.
    #[serde(default)]
    pub faces: Vec<FaceBox>,
    /// Voice-activity flag for the matching audio frame, if audio exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_active: Option<bool>,
}

impl FrameInput {
    pub fn new(frame_index: u64, faces: Vec<FaceBox>, voice_active: Option<bool>) -> Self {
        Self {
            frame_index,
            faces,
            voice_active,
        }
    }

    /// Frame with no detections.
    pub fn empty(frame_index: u64) -> Self {
        Self::new(frame_index, Vec::new(), None)
    }
}

/// Engine decision for one frame, suitable for batch output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameReport {
    pub frame_index: u64,
    pub crop: CropResult,
    /// Smoothed center (single mode) or dual anchor (dual mode).
    pub center: FramePoint,
    /// True when smoothing history was discarded at this frame.
    pub reset: bool,
    pub mode: FramingMode,
    /// True when no face was available and the default anchor was used.
    #[serde(default)]
    pub fallback: bool,
}
