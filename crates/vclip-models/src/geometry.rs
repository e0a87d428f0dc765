//! Geometric primitives shared by the reframing engine.
//!
//! All coordinates are in source-frame pixels with the origin at the
//! top-left corner.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, ModelResult};

/// A pixel coordinate used for raw targets, smoothed centers and history.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FramePoint {
    pub x: f64,
    pub y: f64,
}

impl FramePoint {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &FramePoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &FramePoint) -> FramePoint {
        FramePoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Componentwise blend: `self * weight + other * (1 - weight)`.
    pub fn blend(&self, other: &FramePoint, weight: f64) -> FramePoint {
        FramePoint::new(
            self.x * weight + other.x * (1.0 - weight),
            self.y * weight + other.y * (1.0 - weight),
        )
    }

    /// Componentwise arithmetic mean of a set of points.
    pub fn mean<'a>(points: impl IntoIterator<Item = &'a FramePoint>) -> Option<FramePoint> {
        let (sum_x, sum_y, count) = points
            .into_iter()
            .fold((0.0, 0.0, 0usize), |(sx, sy, n), p| (sx + p.x, sy + p.y, n + 1));

        if count == 0 {
            return None;
        }

        Some(FramePoint::new(sum_x / count as f64, sum_y / count as f64))
    }

    /// True if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned face rectangle produced by an external detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl FaceBox {
    /// Create a face box without validation.
    ///
    /// Detector output is trusted as-is; boxes extending past the frame are
    /// clamped later by the geometry helpers.
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a face box, rejecting inverted or empty rectangles.
    pub fn try_new(x0: f64, y0: f64, x1: f64, y1: f64) -> ModelResult<Self> {
        let face = Self::new(x0, y0, x1, y1);
        face.validate()?;
        Ok(face)
    }

    /// Box centered on a point with the given size.
    pub fn centered_at(center: FramePoint, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
        )
    }

    /// Check `x1 > x0` and `y1 > y0` with finite coordinates.
    pub fn validate(&self) -> ModelResult<()> {
        let finite = [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x1 <= self.x0 || self.y1 <= self.y0 {
            return Err(ModelError::InvalidFaceBox {
                x0: self.x0,
                y0: self.y0,
                x1: self.x1,
                y1: self.y1,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Box area in pixels (zero for degenerate boxes).
    #[inline]
    pub fn area(&self) -> f64 {
        (self.width() * self.height()).max(0.0)
    }

    /// Horizontal center.
    #[inline]
    pub fn cx(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    /// Vertical center.
    #[inline]
    pub fn cy(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> FramePoint {
        FramePoint::new(self.cx(), self.cy())
    }
}

/// Integer crop rectangle in source-frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CropRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Center of the rectangle.
    pub fn center(&self) -> FramePoint {
        FramePoint::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// True if the rectangle lies fully inside a `frame_w x frame_h` frame.
    pub fn fits_within(&self, frame_w: u32, frame_h: u32) -> bool {
        self.right() <= frame_w && self.bottom() <= frame_h
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_box_center_and_area() {
        let face = FaceBox::new(900.0, 400.0, 1100.0, 700.0);
        assert_eq!(face.center(), FramePoint::new(1000.0, 550.0));
        assert_eq!(face.area(), 200.0 * 300.0);
    }

    #[test]
    fn test_face_box_validation() {
        assert!(FaceBox::try_new(0.0, 0.0, 10.0, 10.0).is_ok());
        assert!(FaceBox::try_new(10.0, 0.0, 10.0, 10.0).is_err());
        assert!(FaceBox::try_new(0.0, 5.0, 10.0, 1.0).is_err());
        assert!(FaceBox::try_new(0.0, f64::NAN, 10.0, 10.0).is_err());
    }

    #[test]
    fn test_point_mean() {
        let points = [
            FramePoint::new(0.0, 0.0),
            FramePoint::new(10.0, 20.0),
            FramePoint::new(20.0, 40.0),
        ];
        assert_eq!(FramePoint::mean(&points), Some(FramePoint::new(10.0, 20.0)));
        let empty: Vec<FramePoint> = Vec::new();
        assert_eq!(FramePoint::mean(&empty), None);
    }

    #[test]
    fn test_point_blend() {
        let prev = FramePoint::new(100.0, 100.0);
        let next = FramePoint::new(200.0, 0.0);
        let blended = prev.blend(&next, 0.75);
        assert!((blended.x - 125.0).abs() < 1e-9);
        assert!((blended.y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_crop_rect_bounds() {
        let rect = CropRect::new(656, 0, 608, 1080);
        assert!(rect.fits_within(1920, 1080));
        assert!(!rect.fits_within(1200, 1080));
        assert_eq!(rect.center(), FramePoint::new(960.0, 540.0));
    }
}
