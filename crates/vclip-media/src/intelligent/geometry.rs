//! Crop window geometry.
//!
//! Pure functions that size a window to an aspect ratio and place it inside
//! the source frame. Windows are never shrunk to fit: when centering would
//! push a window past an edge it is shifted back by the minimum amount.

use vclip_models::{CropRect, FramePoint};

/// Largest `(width, height)` matching `target_w / target_h` inside the source.
///
/// The dominant source axis is kept in full. Degenerate inputs yield the
/// whole source frame.
pub fn window_dimensions(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    if source_w == 0 || source_h == 0 || target_w == 0 || target_h == 0 {
        return (source_w, source_h);
    }

    // Compare source_w / source_h against target_w / target_h without floats.
    let source_wider = source_w as u64 * target_h as u64 > target_w as u64 * source_h as u64;

    if source_wider {
        let width = (source_h as u64 * target_w as u64 / target_h as u64) as u32;
        (width.clamp(1, source_w), source_h)
    } else {
        let height = (source_w as u64 * target_h as u64 / target_w as u64) as u32;
        (source_w, height.clamp(1, source_h))
    }
}

/// Place a `crop_w x crop_h` window as close to `center` as the frame allows.
///
/// Sizes larger than the frame are clamped to the frame; a non-finite center
/// is treated as the frame center.
pub fn place_window(
    source_w: u32,
    source_h: u32,
    crop_w: u32,
    crop_h: u32,
    center: FramePoint,
) -> CropRect {
    let crop_w = crop_w.min(source_w);
    let crop_h = crop_h.min(source_h);

    let cx = if center.x.is_finite() {
        center.x
    } else {
        source_w as f64 / 2.0
    };
    let cy = if center.y.is_finite() {
        center.y
    } else {
        source_h as f64 / 2.0
    };

    let x = clamp_offset(cx - crop_w as f64 / 2.0, source_w - crop_w);
    let y = clamp_offset(cy - crop_h as f64 / 2.0, source_h - crop_h);

    CropRect::new(x, y, crop_w, crop_h)
}

/// Largest window with the target aspect ratio, centered near `center`.
pub fn compute_crop_window(
    source_w: u32,
    source_h: u32,
    target_w: u32,
    target_h: u32,
    center: FramePoint,
) -> CropRect {
    let (crop_w, crop_h) = window_dimensions(source_w, source_h, target_w, target_h);
    place_window(source_w, source_h, crop_w, crop_h, center)
}

fn clamp_offset(offset: f64, max_offset: u32) -> u32 {
    offset.round().clamp(0.0, max_offset as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_window_from_landscape() {
        assert_eq!(window_dimensions(1920, 1080, 608, 1080), (608, 1080));
        assert_eq!(window_dimensions(1280, 720, 9, 16), (405, 720));
    }

    #[test]
    fn test_wide_window_from_portrait() {
        // Source narrower than target keeps full width.
        assert_eq!(window_dimensions(1080, 1920, 16, 9), (1080, 607));
    }

    #[test]
    fn test_centered_window() {
        let rect = compute_crop_window(1920, 1080, 608, 1080, FramePoint::new(1000.0, 550.0));
        assert_eq!(rect, CropRect::new(696, 0, 608, 1080));
    }

    #[test]
    fn test_shift_instead_of_shrink_at_edges() {
        let left = compute_crop_window(1920, 1080, 608, 1080, FramePoint::new(10.0, 540.0));
        assert_eq!(left, CropRect::new(0, 0, 608, 1080));

        let right = compute_crop_window(1920, 1080, 608, 1080, FramePoint::new(1910.0, 540.0));
        assert_eq!(right, CropRect::new(1312, 0, 608, 1080));
    }

    #[test]
    fn test_center_outside_frame_clamps() {
        let rect = compute_crop_window(1920, 1080, 608, 1080, FramePoint::new(-500.0, 5000.0));
        assert_eq!(rect, CropRect::new(0, 0, 608, 1080));
        assert!(rect.fits_within(1920, 1080));
    }

    #[test]
    fn test_non_finite_center_uses_frame_center() {
        let rect = compute_crop_window(1920, 1080, 608, 1080, FramePoint::new(f64::NAN, 0.0));
        assert_eq!(rect.x, 656);
    }

    #[test]
    fn test_degenerate_frame() {
        let rect = compute_crop_window(0, 0, 608, 1080, FramePoint::new(10.0, 10.0));
        assert_eq!(rect, CropRect::new(0, 0, 0, 0));

        let rect = compute_crop_window(640, 480, 0, 1080, FramePoint::new(10.0, 10.0));
        assert_eq!(rect, CropRect::new(0, 0, 640, 480));
    }

    #[test]
    fn test_place_oversized_window() {
        let rect = place_window(100, 100, 400, 50, FramePoint::new(50.0, 90.0));
        assert_eq!(rect, CropRect::new(0, 50, 100, 50));
    }
}
