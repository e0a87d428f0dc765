//! Speaker-aware vertical reframing.
//!
//! Converts per-frame face detections on a horizontal source into a
//! smoothly moving 9:16 crop. Each stream owns a [`ReframingEngine`]; frames
//! are pushed in order and each yields a [`vclip_models::CropResult`].
//!
//! # Architecture
//!
//! ```text
//! Frame (faces, voice flag)
//!     │
//!     ▼
//! ┌──────────────────┐
//! │  Scene Reset     │ ← Drop history at confirmed cuts
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  Speaker Scorer  │ ← None / single / dual pair
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Temporal Smoother│ ← Average, clamp, blend
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  Crop Compositor │ ← Single window or stacked halves
//! └────────┬─────────┘
//!          │
//!          ▼
//!     CropResult
//! ```

pub mod compositor;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod scene_reset;
pub mod smoother;
pub mod speaker_scorer;


pub use compositor::CropCompositor;
pub use config::{FallbackAnchor, ReframeConfig, SeparatorStyle};
pub use engine::{close_stream, reset_reframing_stream, EngineState, ReframingEngine, StreamSummary};
pub use geometry::{compute_crop_window, place_window, window_dimensions};
pub use scene_reset::SceneResetController;
pub use smoother::{SmoothingState, TemporalSmoother};
pub use speaker_scorer::{score_face, select_speaker, FaceScore, ScoringContext, SpeakerCandidate};
