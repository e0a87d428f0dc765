//! Active speaker selection.
//!
//! Picks what the camera should follow from the faces visible in a frame:
//!
//! 1. No faces: nothing to follow.
//! 2. One face: follow it.
//! 3. Two faces with dual mode enabled: frame both, left speaker first.
//! 4. Otherwise: score each face and follow the best one.
//!
//! Scoring weights continuity highest so the camera does not flip between
//! similarly sized faces when the detector flickers.

use tracing::trace;
use vclip_models::{FaceBox, FramePoint};

/// Weight of relative face size.
pub const SIZE_WEIGHT: f64 = 0.35;
/// Weight of horizontal centrality.
pub const CENTER_WEIGHT: f64 = 0.25;
/// Weight of closeness to the previous crop center.
pub const STABILITY_WEIGHT: f64 = 0.40;
/// Multiplier applied when voice activity is detected.
pub const VOICE_BOOST: f64 = 1.15;

/// What the camera should follow this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeakerCandidate {
    /// No face visible
    None,
    /// A single target face
    Single(FaceBox),
    /// Two speakers, ordered left to right by horizontal center
    DualPair(FaceBox, FaceBox),
}

impl SpeakerCandidate {
    /// Raw target point for this candidate, if any.
    pub fn center(&self) -> Option<FramePoint> {
        match self {
            SpeakerCandidate::None => None,
            SpeakerCandidate::Single(face) => Some(face.center()),
            SpeakerCandidate::DualPair(left, right) => Some(left.center().midpoint(&right.center())),
        }
    }
}

/// Per-frame inputs to speaker selection.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext {
    pub frame_width: u32,
    pub frame_height: u32,
    pub voice_active: Option<bool>,
    pub previous_center: Option<FramePoint>,
}

/// Score breakdown for one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceScore {
    pub size_score: f64,
    pub center_score: f64,
    pub stability_score: f64,
    pub total: f64,
}

/// Select the speaker candidate for a frame.
pub fn select_speaker(faces: &[FaceBox], ctx: &ScoringContext, dual_mode_enabled: bool) -> SpeakerCandidate {
    match faces {
        [] => SpeakerCandidate::None,
        [only] => SpeakerCandidate::Single(*only),
        [a, b] if dual_mode_enabled => {
            if b.cx() < a.cx() {
                SpeakerCandidate::DualPair(*b, *a)
            } else {
                SpeakerCandidate::DualPair(*a, *b)
            }
        }
        _ => SpeakerCandidate::Single(best_face(faces, ctx)),
    }
}

/// Highest scoring face; ties go to the first face encountered.
///
/// `faces` must be non-empty.
fn best_face(faces: &[FaceBox], ctx: &ScoringContext) -> FaceBox {
    let mut best = faces[0];
    let mut best_score = f64::NEG_INFINITY;

    for (i, face) in faces.iter().enumerate() {
        let score = score_face(face, ctx);
        trace!(
            face = i,
            size = score.size_score,
            center = score.center_score,
            stability = score.stability_score,
            total = score.total,
            "Scored face"
        );
        if score.total > best_score {
            best_score = score.total;
            best = *face;
        }
    }

    best
}

/// Weighted score for a single face.
pub fn score_face(face: &FaceBox, ctx: &ScoringContext) -> FaceScore {
    let w = ctx.frame_width as f64;
    let h = ctx.frame_height as f64;
    let frame_area = w * h;

    let size_score = if frame_area > 0.0 {
        face.area() / frame_area
    } else {
        0.0
    };

    let half_width = w / 2.0;
    let center_score = if half_width > 0.0 {
        1.0 - (face.cx() - half_width).abs() / half_width
    } else {
        0.0
    };

    let stability_score = match ctx.previous_center {
        Some(prev) => {
            let max_distance = (w * w + h * h).sqrt() / 3.0;
            if max_distance > 0.0 {
                (1.0 - face.center().distance(&prev) / max_distance).max(0.0)
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    let mut total =
        SIZE_WEIGHT * size_score + CENTER_WEIGHT * center_score + STABILITY_WEIGHT * stability_score;
    if ctx.voice_active == Some(true) {
        total *= VOICE_BOOST;
    }
    if !total.is_finite() {
        total = f64::NEG_INFINITY;
    }

    FaceScore {
        size_score,
        center_score,
        stability_score,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(previous_center: Option<FramePoint>) -> ScoringContext {
        ScoringContext {
            frame_width: 1920,
            frame_height: 1080,
            voice_active: None,
            previous_center,
        }
    }

    #[test]
    fn test_no_faces() {
        assert_eq!(select_speaker(&[], &ctx(None), true), SpeakerCandidate::None);
        assert_eq!(SpeakerCandidate::None.center(), None);
    }

    #[test]
    fn test_single_face() {
        let face = FaceBox::new(900.0, 400.0, 1100.0, 700.0);
        assert_eq!(select_speaker(&[face], &ctx(None), true), SpeakerCandidate::Single(face));
    }

    #[test]
    fn test_dual_pair_sorted_left_to_right() {
        let right = FaceBox::new(1400.0, 300.0, 1600.0, 500.0);
        let left = FaceBox::new(200.0, 300.0, 400.0, 500.0);
        let candidate = select_speaker(&[right, left], &ctx(None), true);
        assert_eq!(candidate, SpeakerCandidate::DualPair(left, right));
        assert_eq!(candidate.center(), Some(FramePoint::new(900.0, 400.0)));
    }

    #[test]
    fn test_two_faces_without_dual_mode_scores() {
        let small = FaceBox::new(100.0, 100.0, 150.0, 150.0);
        let large_central = FaceBox::new(860.0, 300.0, 1060.0, 550.0);
        let candidate = select_speaker(&[small, large_central], &ctx(None), false);
        assert_eq!(candidate, SpeakerCandidate::Single(large_central));
    }

    #[test]
    fn test_stability_prefers_previous_position() {
        // Mirror-image faces: identical size and centrality.
        let left = FaceBox::new(400.0, 400.0, 600.0, 600.0);
        let right = FaceBox::new(1320.0, 400.0, 1520.0, 600.0);
        let third = FaceBox::new(0.0, 0.0, 20.0, 20.0);

        let near_right = ctx(Some(FramePoint::new(1400.0, 500.0)));
        assert_eq!(
            select_speaker(&[left, right, third], &near_right, true),
            SpeakerCandidate::Single(right)
        );

        let near_left = ctx(Some(FramePoint::new(520.0, 480.0)));
        assert_eq!(
            select_speaker(&[left, right, third], &near_left, true),
            SpeakerCandidate::Single(left)
        );
    }

    #[test]
    fn test_ties_go_to_first_face() {
        let left = FaceBox::new(400.0, 400.0, 600.0, 600.0);
        let right = FaceBox::new(1320.0, 400.0, 1520.0, 600.0);
        let third = FaceBox::new(0.0, 0.0, 20.0, 20.0);
        assert_eq!(
            select_speaker(&[left, right, third], &ctx(None), false),
            SpeakerCandidate::Single(left)
        );
        assert_eq!(
            select_speaker(&[right, left, third], &ctx(None), false),
            SpeakerCandidate::Single(right)
        );
    }

    #[test]
    fn test_score_components() {
        let face = FaceBox::new(860.0, 440.0, 1060.0, 640.0);
        let mut context = ctx(Some(face.center()));
        let score = score_face(&face, &context);
        assert!((score.size_score - 40_000.0 / (1920.0 * 1080.0)).abs() < 1e-12);
        assert!((score.center_score - 1.0).abs() < 1e-12);
        assert!((score.stability_score - 1.0).abs() < 1e-12);

        context.voice_active = Some(true);
        let boosted = score_face(&face, &context);
        assert!((boosted.total - score.total * VOICE_BOOST).abs() < 1e-12);

        context.voice_active = Some(false);
        assert_eq!(score_face(&face, &context).total, score.total);
    }

    #[test]
    fn test_far_face_has_zero_stability() {
        let face = FaceBox::new(0.0, 0.0, 10.0, 10.0);
        let score = score_face(&face, &ctx(Some(FramePoint::new(1920.0, 1080.0))));
        assert_eq!(score.stability_score, 0.0);
    }

    #[test]
    fn test_zero_area_frame_does_not_panic() {
        let context = ScoringContext {
            frame_width: 0,
            frame_height: 0,
            voice_active: Some(true),
            previous_center: Some(FramePoint::new(0.0, 0.0)),
        };
        let faces = [FaceBox::new(0.0, 0.0, 1.0, 1.0), FaceBox::new(2.0, 2.0, 3.0, 3.0), FaceBox::new(4.0, 4.0, 5.0, 5.0)];
        assert_eq!(select_speaker(&faces, &context, false), SpeakerCandidate::Single(faces[0]));
    }
}
