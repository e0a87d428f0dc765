//! Speaker-aware vertical reframing.
//!
//! This crate provides:
//! - Per-stream crop computation from face detections (`intelligent`)
//! - Pixel rendering of single and dual-speaker crops (`render`)
//! - Prometheus metric names and recorders (`metrics`)

pub mod error;
pub mod intelligent;
pub mod metrics;
pub mod render;

pub use error::{MediaError, MediaResult};
pub use intelligent::{
    close_stream, reset_reframing_stream, EngineState, FallbackAnchor, ReframeConfig,
    ReframingEngine, SeparatorStyle, StreamSummary,
};
pub use render::render_crop;
