//! Crop composition for single and dual-speaker layouts.
//!
//! Converts chosen centers into concrete source rectangles. Pixel work
//! (resize, stacking, divider) happens later in [`crate::render`].

use vclip_models::{CropRect, CropResult, FaceBox, FramePoint, TargetSize};

use super::config::ReframeConfig;
use super::geometry::{compute_crop_window, place_window};

/// Builds crop rectangles for the configured target.
#[derive(Debug, Clone, Copy)]
pub struct CropCompositor {
    target: TargetSize,
    dual_headroom_factor: f64,
    dual_crop_ratio: f64,
}

impl CropCompositor {
    pub fn new(config: &ReframeConfig) -> Self {
        Self {
            target: config.target,
            dual_headroom_factor: config.dual_headroom_factor,
            dual_crop_ratio: config.dual_crop_ratio,
        }
    }

    /// Full-height crop around a smoothed center.
    pub fn single(&self, frame_width: u32, frame_height: u32, center: FramePoint) -> CropResult {
        let rect = compute_crop_window(
            frame_width,
            frame_height,
            self.target.width,
            self.target.height,
            center,
        );
        CropResult::Single { rect }
    }

    /// Split-screen crop: `top` speaker above `bottom` speaker.
    pub fn dual(&self, frame_width: u32, frame_height: u32, top: &FaceBox, bottom: &FaceBox) -> CropResult {
        CropResult::DualSpeaker {
            top_rect: self.speaker_region(frame_width, frame_height, top),
            bottom_rect: self.speaker_region(frame_width, frame_height, bottom),
        }
    }

    /// Crop for one half of the composite, lifted above the face for headroom.
    pub fn speaker_region(&self, frame_width: u32, frame_height: u32, face: &FaceBox) -> CropRect {
        let (crop_w, crop_h) = self.speaker_region_size(frame_width, frame_height);
        let padding_y = face.height().max(0.0) * self.dual_headroom_factor / 2.0;
        let center = FramePoint::new(face.cx(), face.cy() - padding_y);
        place_window(frame_width, frame_height, crop_w, crop_h, center)
    }

    /// Region size with the half-target aspect ratio.
    fn speaker_region_size(&self, frame_width: u32, frame_height: u32) -> (u32, u32) {
        let half = self.target.half();
        if frame_width == 0 || frame_height == 0 || half.width == 0 || half.height == 0 {
            return (frame_width, frame_height);
        }

        let mut crop_h = ((half.height as f64 * self.dual_crop_ratio).floor() as u32)
            .clamp(1, frame_height);
        let mut crop_w = (crop_h as u64 * half.width as u64 / half.height as u64) as u32;

        if crop_w > frame_width {
            crop_w = frame_width;
            crop_h = ((frame_width as u64 * half.height as u64 / half.width as u64) as u32)
                .clamp(1, frame_height);
        }

        (crop_w.max(1), crop_h)
    }
}
