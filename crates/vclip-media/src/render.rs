//! Pixel rendering of crop decisions.
//!
//! Turns a [`CropResult`] and a decoded source frame into the final
//! vertical frame. Dual-speaker results are stacked top/bottom with an
//! optional divider.

use image::imageops::{self, FilterType};
use image::{GenericImage, Rgb, RgbImage};
use vclip_models::{CropRect, CropResult, TargetSize};

use crate::error::{MediaError, MediaResult};
use crate::intelligent::config::SeparatorStyle;

/// Render one output frame at `target` resolution.
pub fn render_crop(
    frame: &RgbImage,
    crop: &CropResult,
    target: TargetSize,
    separator: Option<SeparatorStyle>,
) -> MediaResult<RgbImage> {
    match crop {
        CropResult::Single { rect } => crop_and_resize(frame, rect, target.width, target.height),
        CropResult::DualSpeaker {
            top_rect,
            bottom_rect,
        } => {
            let top_height = target.height / 2;
            let bottom_height = target.height - top_height;

            let top = crop_and_resize(frame, top_rect, target.width, top_height)?;
            let bottom = crop_and_resize(frame, bottom_rect, target.width, bottom_height)?;

            let mut canvas = RgbImage::new(target.width, target.height);
            canvas.copy_from(&top, 0, 0)?;
            canvas.copy_from(&bottom, 0, top_height)?;

            if let Some(style) = separator {
                draw_separator(&mut canvas, top_height, style);
            }
            Ok(canvas)
        }
    }
}

fn crop_and_resize(frame: &RgbImage, rect: &CropRect, width: u32, height: u32) -> MediaResult<RgbImage> {
    if rect.width == 0 || rect.height == 0 || !rect.fits_within(frame.width(), frame.height()) {
        return Err(MediaError::InvalidCrop {
            rect: rect.to_string(),
            frame_width: frame.width(),
            frame_height: frame.height(),
        });
    }

    let region = imageops::crop_imm(frame, rect.x, rect.y, rect.width, rect.height).to_image();
    if rect.width == width && rect.height == height {
        return Ok(region);
    }
    Ok(imageops::resize(&region, width, height, FilterType::Lanczos3))
}

/// Horizontal band centered on row `y`.
fn draw_separator(canvas: &mut RgbImage, y: u32, style: SeparatorStyle) {
    if style.thickness == 0 {
        return;
    }
    let start = y.saturating_sub(style.thickness / 2);
    let end = (start + style.thickness).min(canvas.height());
    let color = Rgb(style.color);

    for row in start..end {
        for col in 0..canvas.width() {
            canvas.put_pixel(col, row, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RgbImage {
        // Left half red, right half blue.
        RgbImage::from_fn(1920, 1080, |x, _| {
            if x < 960 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        })
    }

    #[test]
    fn test_single_crop_output_size() {
        let crop = CropResult::Single {
            rect: CropRect::new(100, 0, 608, 1080),
        };
        let out = render_crop(&source(), &crop, TargetSize::SHORTS, None).unwrap();
        assert_eq!(out.dimensions(), (608, 1080));
        assert_eq!(out.get_pixel(300, 500), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_dual_composite_stacks_halves() {
        let crop = CropResult::DualSpeaker {
            top_rect: CropRect::new(100, 100, 486, 432),
            bottom_rect: CropRect::new(1300, 100, 486, 432),
        };
        let out = render_crop(&source(), &crop, TargetSize::SHORTS, None).unwrap();
        assert_eq!(out.dimensions(), (608, 1080));
        assert_eq!(out.get_pixel(300, 200), &Rgb([255, 0, 0]));
        assert_eq!(out.get_pixel(300, 800), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_separator_drawn_at_midline() {
        let crop = CropResult::DualSpeaker {
            top_rect: CropRect::new(100, 100, 486, 432),
            bottom_rect: CropRect::new(1300, 100, 486, 432),
        };
        let style = SeparatorStyle::default();
        let out = render_crop(&source(), &crop, TargetSize::SHORTS, Some(style)).unwrap();
        assert_eq!(out.get_pixel(10, 539), &Rgb([40, 40, 40]));
        assert_eq!(out.get_pixel(10, 540), &Rgb([40, 40, 40]));
        assert_eq!(out.get_pixel(10, 542), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_out_of_bounds_crop_rejected() {
        let crop = CropResult::Single {
            rect: CropRect::new(1500, 0, 608, 1080),
        };
        let err = render_crop(&source(), &crop, TargetSize::SHORTS, None).unwrap_err();
        assert!(matches!(err, MediaError::InvalidCrop { .. }));
    }
}
