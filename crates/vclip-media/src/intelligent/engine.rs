//! Per-stream reframing engine.
//!
//! Owns the mutable state of one video stream and drives scene resets,
//! speaker selection, smoothing and composition frame by frame. Frames must
//! arrive in strictly increasing index order; one engine is never shared
//! between streams.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vclip_models::{
    CropResult, FaceBox, FrameInput, FramePoint, FrameReport, FramingMode, SceneContext,
    SmoothingConfig,
};

use super::compositor::CropCompositor;
use super::config::ReframeConfig;
use super::scene_reset::SceneResetController;
use super::smoother::{SmoothingState, TemporalSmoother};
use super::speaker_scorer::{select_speaker, ScoringContext, SpeakerCandidate};
use crate::error::{MediaError, MediaResult};
use crate::metrics;

/// Mutable per-stream state.
///
/// A scene reset clears the smoothing history but keeps the dual-speaker
/// bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    pub smoothing: SmoothingState,
    /// Last frame rendered as a dual-speaker composite
    pub last_dual_speaker_frame: Option<u64>,
    /// Frame of the most recent single <-> dual switch
    pub last_mode_switch_frame: Option<u64>,
    pub mode: FramingMode,
    pub last_frame_index: Option<u64>,
}

impl EngineState {
    pub fn previous_center(&self) -> Option<FramePoint> {
        self.smoothing.previous_center
    }

    /// Discard smoothing history (scene cut).
    pub fn reset(&mut self) {
        self.smoothing.clear();
    }
}

/// Counters reported when a stream is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub frames_processed: u64,
    pub scene_resets: u64,
    pub dual_frames: u64,
    pub fallback_frames: u64,
    pub last_frame_index: Option<u64>,
}

/// Stateful reframing engine for a single stream.
#[derive(Debug, Clone)]
pub struct ReframingEngine {
    config: ReframeConfig,
    scenes: SceneContext,
    reset_controller: SceneResetController,
    smoother: TemporalSmoother,
    compositor: CropCompositor,
    state: EngineState,
    summary: StreamSummary,
}

impl ReframingEngine {
    /// Start a new stream.
    pub fn new(config: ReframeConfig, scenes: SceneContext) -> MediaResult<Self> {
        config.validate()?;

        debug!(
            smoothing_factor = config.smoothing.smoothing_factor,
            max_jump = config.smoothing.max_jump_distance,
            stability_frames = config.smoothing.stability_frames,
            scene_boundaries = scenes.boundary_frame_indices.len(),
            dual_mode = config.dual_mode_enabled,
            "Starting reframing stream"
        );

        Ok(Self {
            reset_controller: SceneResetController::new(
                config.ignore_micro_cuts,
                config.micro_cut_threshold_frames,
            ),
            smoother: TemporalSmoother::new(config.smoothing),
            compositor: CropCompositor::new(&config),
            config,
            scenes,
            state: EngineState::default(),
            summary: StreamSummary::default(),
        })
    }

    pub fn config(&self) -> &ReframeConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn summary(&self) -> &StreamSummary {
        &self.summary
    }

    /// Compute the crop for one frame.
    pub fn compute_crop(
        &mut self,
        frame_index: u64,
        faces: &[FaceBox],
        voice_active: Option<bool>,
        frame_width: u32,
        frame_height: u32,
    ) -> MediaResult<CropResult> {
        self.compute_frame(frame_index, faces, voice_active, frame_width, frame_height)
            .map(|report| report.crop)
    }

    /// Compute the crop for one frame along with the decision details.
    pub fn compute_frame(
        &mut self,
        frame_index: u64,
        faces: &[FaceBox],
        voice_active: Option<bool>,
        frame_width: u32,
        frame_height: u32,
    ) -> MediaResult<FrameReport> {
        if let Some(previous) = self.state.last_frame_index {
            if frame_index <= previous {
                return Err(MediaError::FrameOutOfOrder {
                    previous,
                    received: frame_index,
                });
            }
        }
        self.state.last_frame_index = Some(frame_index);

        let reset = self.reset_controller.evaluate(frame_index, &self.scenes);
        if reset {
            self.state.reset();
            self.summary.scene_resets += 1;
            metrics::record_scene_reset();
            debug!(frame = frame_index, resets = self.summary.scene_resets, "Scene reset");
        }

        let ctx = ScoringContext {
            frame_width,
            frame_height,
            voice_active,
            previous_center: self.state.previous_center(),
        };
        let candidate = select_speaker(faces, &ctx, self.config.dual_mode_enabled);

        let report = match candidate {
            SpeakerCandidate::DualPair(top, bottom) if self.dual_allowed(frame_index) => {
                self.render_dual(frame_index, &top, &bottom, frame_width, frame_height, reset)
            }
            // A refused pair is framed single around the pair midpoint.
            other => self.render_single(frame_index, other, frame_width, frame_height, reset),
        };

        self.summary.frames_processed += 1;
        self.summary.last_frame_index = Some(frame_index);
        metrics::record_frame(report.mode);

        Ok(report)
    }

    /// Convenience wrapper over [`ReframingEngine::compute_frame`].
    pub fn process_frame(
        &mut self,
        frame: &FrameInput,
        frame_width: u32,
        frame_height: u32,
    ) -> MediaResult<FrameReport> {
        self.compute_frame(
            frame.frame_index,
            &frame.faces,
            frame.voice_active,
            frame_width,
            frame_height,
        )
    }

    /// Process a whole batch in order, stopping at the first contract violation.
    pub fn process_all<'a>(
        &mut self,
        frames: impl IntoIterator<Item = &'a FrameInput>,
        frame_width: u32,
        frame_height: u32,
    ) -> MediaResult<Vec<FrameReport>> {
        frames
            .into_iter()
            .map(|frame| self.process_frame(frame, frame_width, frame_height))
            .collect()
    }

    /// Finish the stream and release its state.
    pub fn close(self) -> StreamSummary {
        info!(
            frames = self.summary.frames_processed,
            resets = self.summary.scene_resets,
            dual_frames = self.summary.dual_frames,
            fallback_frames = self.summary.fallback_frames,
            "Reframing stream closed"
        );
        self.summary
    }

    /// Dual framing continues freely once active; entering it requires
    /// `stability_frames / 2` frames since the previous mode switch.
    fn dual_allowed(&self, frame_index: u64) -> bool {
        if self.state.mode == FramingMode::DualSpeaker {
            return true;
        }
        match self.state.last_mode_switch_frame {
            None => true,
            Some(switched_at) => {
                frame_index.saturating_sub(switched_at) >= self.config.smoothing.dual_switch_frames()
            }
        }
    }

    fn set_mode(&mut self, mode: FramingMode, frame_index: u64) {
        if self.state.mode != mode {
            debug!(frame = frame_index, from = %self.state.mode, to = %mode, "Framing mode switch");
            self.state.mode = mode;
            self.state.last_mode_switch_frame = Some(frame_index);
        }
    }

    fn render_dual(
        &mut self,
        frame_index: u64,
        top: &FaceBox,
        bottom: &FaceBox,
        frame_width: u32,
        frame_height: u32,
        reset: bool,
    ) -> FrameReport {
        self.set_mode(FramingMode::DualSpeaker, frame_index);
        self.state.last_dual_speaker_frame = Some(frame_index);
        self.summary.dual_frames += 1;

        // Keep a single-mode anchor so a later fallback resumes smoothly.
        let anchor = top.center().midpoint(&bottom.center());
        self.state.smoothing.anchor_at(anchor);

        FrameReport {
            frame_index,
            crop: self.compositor.dual(frame_width, frame_height, top, bottom),
            center: anchor,
            reset,
            mode: FramingMode::DualSpeaker,
            fallback: false,
        }
    }

    fn render_single(
        &mut self,
        frame_index: u64,
        candidate: SpeakerCandidate,
        frame_width: u32,
        frame_height: u32,
        reset: bool,
    ) -> FrameReport {
        self.set_mode(FramingMode::Single, frame_index);

        let (raw_target, fallback) = match candidate.center() {
            Some(center) => (center, false),
            None => (self.config.fallback.point(frame_width, frame_height), true),
        };
        if fallback {
            self.summary.fallback_frames += 1;
        }

        let center = self.smoother.apply(raw_target, &mut self.state.smoothing, reset);

        FrameReport {
            frame_index,
            crop: self.compositor.single(frame_width, frame_height, center),
            center,
            reset,
            mode: FramingMode::Single,
            fallback,
        }
    }
}

/// Start a stream with default framing parameters.
pub fn reset_reframing_stream(
    config: SmoothingConfig,
    scene_context: SceneContext,
    dual_mode_enabled: bool,
) -> MediaResult<ReframingEngine> {
    let config = ReframeConfig {
        smoothing: config,
        dual_mode_enabled,
        ..Default::default()
    };
    ReframingEngine::new(config, scene_context)
}

/// Close a stream, discarding its state.
pub fn close_stream(handle: ReframingEngine) -> StreamSummary {
    handle.close()
}
