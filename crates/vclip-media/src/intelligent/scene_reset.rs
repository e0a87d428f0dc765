//! Scene-aware smoothing resets.
//!
//! Scene cuts are precomputed upstream. At a real cut the crop must snap to
//! the new subject instead of gliding across the frame, so the engine drops
//! its smoothing history. Very short scenes (flash cuts, compression
//! artifacts) are treated as noise and do not trigger a reset.

use tracing::debug;
use vclip_models::SceneContext;

/// Decides whether a frame should discard smoothing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneResetController {
    ignore_micro_cuts: bool,
    micro_cut_threshold_frames: u64,
}

impl Default for SceneResetController {
    fn default() -> Self {
        Self {
            ignore_micro_cuts: true,
            micro_cut_threshold_frames: 10,
        }
    }
}

impl SceneResetController {
    pub fn new(ignore_micro_cuts: bool, micro_cut_threshold_frames: u64) -> Self {
        Self {
            ignore_micro_cuts,
            micro_cut_threshold_frames,
        }
    }

    /// True if `frame_index` is a confirmed cut.
    ///
    /// An empty context never resets.
    pub fn evaluate(&self, frame_index: u64, scenes: &SceneContext) -> bool {
        if !scenes.is_boundary(frame_index) {
            return false;
        }

        if self.ignore_micro_cuts && self.is_micro_cut(frame_index, scenes) {
            debug!(frame = frame_index, "Ignoring micro-cut");
            return false;
        }

        true
    }

    fn is_micro_cut(&self, frame_index: u64, scenes: &SceneContext) -> bool {
        scenes
            .scene_length_at(frame_index)
            .is_some_and(|length| length < self.micro_cut_threshold_frames)
    }
}
