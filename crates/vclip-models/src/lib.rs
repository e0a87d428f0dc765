//! Shared data models for the ViralClip reframing pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Face boxes, points and crop rectangles
//! - Smoothing presets
//! - Scene-cut context
//! - Per-frame inputs and crop results
//! - Stream identity and status

pub mod crop;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod scene;
pub mod smoothing;
pub mod stream;

// Re-export common types
pub use crop::{CropResult, FramingMode, TargetSize};
pub use error::{ModelError, ModelResult};
pub use frame::{FrameInput, FrameReport};
pub use geometry::{CropRect, FaceBox, FramePoint};
pub use scene::{SceneContext, SceneSpan};
pub use smoothing::{SmoothingConfig, SmoothingStrength};
pub use stream::{StreamId, StreamState, StreamStatus};
