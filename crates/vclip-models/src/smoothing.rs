//! Smoothing presets for the temporal crop-center filter.
//!
//! A stream picks one named strength at start; the strength maps to a fixed
//! `(smoothing_factor, max_jump_distance, stability_frames)` tuple:
//!
//! - `low`: `(0.3, 80, 3)` - responsive, follows the subject closely
//! - `medium`: `(0.75, 50, 5)` - balanced default
//! - `high`: `(0.9, 25, 8)` - calm camera
//! - `very_high`: `(0.95, 15, 12)` - most stable, slowest to follow

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Named smoothing preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingStrength {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl SmoothingStrength {
    /// All available presets, weakest first.
    pub const ALL: &'static [SmoothingStrength] = &[
        SmoothingStrength::Low,
        SmoothingStrength::Medium,
        SmoothingStrength::High,
        SmoothingStrength::VeryHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SmoothingStrength::Low => "low",
            SmoothingStrength::Medium => "medium",
            SmoothingStrength::High => "high",
            SmoothingStrength::VeryHigh => "very_high",
        }
    }

    /// Fixed filter parameters for this preset.
    pub fn config(&self) -> SmoothingConfig {
        let (smoothing_factor, max_jump_distance, stability_frames) = match self {
            SmoothingStrength::Low => (0.3, 80.0, 3),
            SmoothingStrength::Medium => (0.75, 50.0, 5),
            SmoothingStrength::High => (0.9, 25.0, 8),
            SmoothingStrength::VeryHigh => (0.95, 15.0, 12),
        };
        SmoothingConfig {
            smoothing_factor,
            max_jump_distance,
            stability_frames,
        }
    }

    /// Parse a preset name, falling back to `medium` for unknown names.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for SmoothingStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SmoothingStrength {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(SmoothingStrength::Low),
            "medium" => Ok(SmoothingStrength::Medium),
            "high" => Ok(SmoothingStrength::High),
            "very_high" | "very-high" | "veryhigh" => Ok(SmoothingStrength::VeryHigh),
            _ => Err(ModelError::UnknownSmoothingStrength(s.to_string())),
        }
    }
}

/// Parameters of the crop-center filter. Immutable for the life of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SmoothingConfig {
    /// Weight of the previous center in the exponential blend, in `[0, 1]`.
    pub smoothing_factor: f64,
    /// Maximum displacement of the averaged target per frame, in pixels.
    pub max_jump_distance: f64,
    /// Length of the moving-average window.
    pub stability_frames: usize,
}

impl SmoothingConfig {
    /// Create a validated config.
    pub fn new(
        smoothing_factor: f64,
        max_jump_distance: f64,
        stability_frames: usize,
    ) -> ModelResult<Self> {
        let config = Self {
            smoothing_factor,
            max_jump_distance,
            stability_frames,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(0.0..=1.0).contains(&self.smoothing_factor) {
            return Err(ModelError::invalid_smoothing(format!(
                "smoothing_factor {} outside [0, 1]",
                self.smoothing_factor
            )));
        }
        if !(self.max_jump_distance.is_finite() && self.max_jump_distance > 0.0) {
            return Err(ModelError::invalid_smoothing(format!(
                "max_jump_distance {} must be positive",
                self.max_jump_distance
            )));
        }
        if self.stability_frames == 0 {
            return Err(ModelError::invalid_smoothing(
                "stability_frames must be at least 1",
            ));
        }
        Ok(())
    }

    /// Frames that must pass after a mode switch before dual-speaker
    /// framing may be entered again.
    pub fn dual_switch_frames(&self) -> u64 {
        (self.stability_frames / 2) as u64
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingStrength::default().config()
    }
}

impl From<SmoothingStrength> for SmoothingConfig {
    fn from(strength: SmoothingStrength) -> Self {
        strength.config()
    }
}
