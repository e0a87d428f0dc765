//! Configuration for the reframing engine.

use serde::{Deserialize, Serialize};
use vclip_models::{FramePoint, SmoothingConfig, SmoothingStrength, TargetSize};

use crate::error::{MediaError, MediaResult};

/// Where the crop goes when no face is available.
///
/// Expressed as fractions of the frame size. The default sits at 75% of the
/// width and mid-height, so unannotated footage favors screen-right content
/// rather than a dead-center guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackAnchor {
    pub x_ratio: f64,
    pub y_ratio: f64,
}

impl FallbackAnchor {
    pub const SCREEN_RIGHT: FallbackAnchor = FallbackAnchor {
        x_ratio: 0.75,
        y_ratio: 0.5,
    };

    pub const CENTER: FallbackAnchor = FallbackAnchor {
        x_ratio: 0.5,
        y_ratio: 0.5,
    };

    /// Anchor point for a concrete frame size.
    pub fn point(&self, frame_width: u32, frame_height: u32) -> FramePoint {
        FramePoint::new(
            frame_width as f64 * self.x_ratio,
            frame_height as f64 * self.y_ratio,
        )
    }
}

impl Default for FallbackAnchor {
    fn default() -> Self {
        Self::SCREEN_RIGHT
    }
}

/// Horizontal divider drawn between the two halves of a dual composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorStyle {
    pub color: [u8; 3],
    pub thickness: u32,
}

impl Default for SeparatorStyle {
    fn default() -> Self {
        Self {
            color: [40, 40, 40],
            thickness: 2,
        }
    }
}

/// Configuration for one reframing stream.
///
/// Missing fields deserialize to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReframeConfig {
    // === Temporal Smoothing ===
    /// Filter parameters (usually from a named preset)
    pub smoothing: SmoothingConfig,

    // === Output ===
    /// Output resolution (default: 608x1080)
    pub target: TargetSize,

    // === Scene Resets ===
    /// Treat very short scenes as noise instead of cuts (default: true)
    pub ignore_micro_cuts: bool,

    /// Scenes shorter than this many frames are micro-cuts (default: 10)
    pub micro_cut_threshold_frames: u64,

    // === Speaker Selection ===
    /// Split-screen framing when exactly two faces are visible (default: false)
    pub dual_mode_enabled: bool,

    /// Anchor used when no face is detected
    pub fallback: FallbackAnchor,

    // === Dual-Speaker Framing ===
    /// Headroom above each face as a multiple of face height (default: 1.3)
    pub dual_headroom_factor: f64,

    /// Per-speaker crop height as a fraction of the half-target height (default: 0.8)
    pub dual_crop_ratio: f64,

    /// Divider between halves; `None` disables it
    pub separator: Option<SeparatorStyle>,
}

impl Default for ReframeConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingConfig::default(),
            target: TargetSize::default(),
            ignore_micro_cuts: true,
            micro_cut_threshold_frames: 10,
            dual_mode_enabled: false,
            fallback: FallbackAnchor::default(),
            dual_headroom_factor: 1.3,
            dual_crop_ratio: 0.8,
            separator: Some(SeparatorStyle::default()),
        }
    }
}

impl ReframeConfig {
    /// Default configuration with a named smoothing preset.
    pub fn with_strength(strength: SmoothingStrength) -> Self {
        Self {
            smoothing: strength.config(),
            ..Default::default()
        }
    }

    /// Builder-style toggle for dual-speaker framing.
    pub fn dual_mode(mut self, enabled: bool) -> Self {
        self.dual_mode_enabled = enabled;
        self
    }

    /// Builder-style target override.
    pub fn target(mut self, target: TargetSize) -> Self {
        self.target = target;
        self
    }

    /// Validate all parameters.
    pub fn validate(&self) -> MediaResult<()> {
        self.smoothing.validate()?;

        if self.target.width == 0 || self.target.height < 2 {
            return Err(MediaError::invalid_config(format!(
                "target {} too small",
                self.target
            )));
        }
        if !(0.0..=1.0).contains(&self.fallback.x_ratio)
            || !(0.0..=1.0).contains(&self.fallback.y_ratio)
        {
            return Err(MediaError::invalid_config(
                "fallback anchor must lie inside the frame",
            ));
        }
        if !(self.dual_headroom_factor.is_finite() && self.dual_headroom_factor >= 0.0) {
            return Err(MediaError::invalid_config(
                "dual_headroom_factor must be non-negative",
            ));
        }
        if !(self.dual_crop_ratio > 0.0 && self.dual_crop_ratio <= 1.0) {
            return Err(MediaError::invalid_config(
                "dual_crop_ratio must be in (0, 1]",
            ));
        }
        Ok(())
    }
}
