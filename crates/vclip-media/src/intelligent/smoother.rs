//! Crop-center smoothing for jitter-free virtual camera motion.
//!
//! Each frame the raw target goes through three stages:
//! 1. Moving average over the last `stability_frames` raw targets
//! 2. Displacement clamp: the average may sit at most `max_jump_distance`
//!    from the previous center
//! 3. Exponential blend with the previous center
//!
//! Because the blend only moves part of the way toward the clamped point,
//! the output never moves more than `max_jump_distance` per frame.

use std::collections::VecDeque;

use tracing::trace;
use vclip_models::{FramePoint, SmoothingConfig};

/// Mutable filter history for one stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothingState {
    /// Last smoothed center
    pub previous_center: Option<FramePoint>,
    /// Recent raw targets, oldest first (len <= stability_frames)
    pub recent_centers: VecDeque<FramePoint>,
}

impl SmoothingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all history so the next frame snaps to its target.
    pub fn clear(&mut self) {
        self.previous_center = None;
        self.recent_centers.clear();
    }

    /// Start over from a known anchor.
    pub fn anchor_at(&mut self, center: FramePoint) {
        self.previous_center = Some(center);
        self.recent_centers.clear();
        self.recent_centers.push_back(center);
    }
}

/// Temporal filter over crop centers.
#[derive(Debug, Clone, Copy)]
pub struct TemporalSmoother {
    config: SmoothingConfig,
}

impl TemporalSmoother {
    /// Create a smoother with a validated config.
    pub fn new(config: SmoothingConfig) -> Self {
        Self { config }
    }

    /// Filter one raw target and update `state`.
    ///
    /// With `force_reset`, or when no previous center exists, the output is
    /// exactly `raw_target` and the history restarts from it.
    pub fn apply(&self, raw_target: FramePoint, state: &mut SmoothingState, force_reset: bool) -> FramePoint {
        let previous = match state.previous_center {
            Some(prev) if !force_reset => prev,
            _ => {
                state.anchor_at(raw_target);
                return raw_target;
            }
        };

        state.recent_centers.push_back(raw_target);
        while state.recent_centers.len() > self.config.stability_frames.max(1) {
            state.recent_centers.pop_front();
        }

        let averaged = FramePoint::mean(&state.recent_centers).unwrap_or(raw_target);
        let limited = self.limit_jump(previous, averaged);
        let smoothed = previous.blend(&limited, self.config.smoothing_factor);

        trace!(
            raw_x = raw_target.x,
            raw_y = raw_target.y,
            avg_x = averaged.x,
            avg_y = averaged.y,
            x = smoothed.x,
            y = smoothed.y,
            "Smoothed crop center"
        );

        state.previous_center = Some(smoothed);
        smoothed
    }

    /// Clamp `target` to lie within `max_jump_distance` of `previous`.
    fn limit_jump(&self, previous: FramePoint, target: FramePoint) -> FramePoint {
        let distance = previous.distance(&target);
        let max_jump = self.config.max_jump_distance;

        if distance <= max_jump || distance == 0.0 {
            return target;
        }

        let dir_x = (target.x - previous.x) / distance;
        let dir_y = (target.y - previous.y) / distance;
        FramePoint::new(previous.x + dir_x * max_jump, previous.y + dir_y * max_jump)
    }
}
