//! Crop output types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, ModelResult};
use crate::geometry::CropRect;

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    /// YouTube Shorts resolution used by default.
    pub const SHORTS: TargetSize = TargetSize {
        width: 608,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> ModelResult<Self> {
        if width == 0 || height < 2 {
            return Err(ModelError::InvalidTargetSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// 9:16 target keeping the source height; width rounded up to even.
    pub fn vertical_for_height(height: u32) -> Self {
        let mut width = (height as u64 * 9 / 16) as u32;
        if width % 2 != 0 {
            width += 1;
        }
        Self {
            width: width.max(2),
            height: height.max(2),
        }
    }

    /// Size of one half of a dual-speaker composite.
    pub fn half(&self) -> TargetSize {
        TargetSize {
            width: self.width,
            height: self.height / 2,
        }
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::SHORTS
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Framing decision for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CropResult {
    /// One crop resized to the full target.
    Single { rect: CropRect },
    /// Split-screen: left speaker on top, right speaker below.
    DualSpeaker { top_rect: CropRect, bottom_rect: CropRect },
}

impl CropResult {
    pub fn is_dual(&self) -> bool {
        matches!(self, CropResult::DualSpeaker { .. })
    }

    pub fn mode(&self) -> FramingMode {
        match self {
            CropResult::Single { .. } => FramingMode::Single,
            CropResult::DualSpeaker { .. } => FramingMode::DualSpeaker,
        }
    }

    /// All source rectangles referenced by this result.
    pub fn rects(&self) -> Vec<CropRect> {
        match self {
            CropResult::Single { rect } => vec![*rect],
            CropResult::DualSpeaker {
                top_rect,
                bottom_rect,
            } => vec![*top_rect, *bottom_rect],
        }
    }
}

/// Framing mode of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum FramingMode {
    #[default]
    Single,
    DualSpeaker,
}

impl FramingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FramingMode::Single => "single",
            FramingMode::DualSpeaker => "dual_speaker",
        }
    }
}

impl fmt::Display for FramingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_for_height() {
        assert_eq!(TargetSize::vertical_for_height(1080), TargetSize::new(608, 1080).unwrap());
        assert_eq!(TargetSize::vertical_for_height(720).width, 406);
        assert_eq!(TargetSize::vertical_for_height(1920).width, 1080);
    }

    #[test]
    fn test_invalid_target() {
        assert!(TargetSize::new(0, 100).is_err());
        assert!(TargetSize::new(100, 1).is_err());
    }

    #[test]
    fn test_crop_result_serde_tag() {
        let result = CropResult::Single {
            rect: CropRect::new(10, 0, 608, 1080),
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["mode"], "single");
        assert_eq!(json["rect"]["width"], 608);

        let back: CropResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.mode(), FramingMode::Single);
    }
}
