//! Error types for reframing operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during reframing.
///
/// Missing faces, missing scene data and degenerate geometry are not
/// errors; they degrade to fallbacks inside the engine.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Frame {received} is out of order (last processed frame was {previous})")]
    FrameOutOfOrder { previous: u64, received: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Crop {rect} exceeds {frame_width}x{frame_height} frame")]
    InvalidCrop {
        rect: String,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Model error: {0}")]
    Model(#[from] vclip_models::ModelError),
}

impl MediaError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// True for caller contract violations that must abort the stream.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::FrameOutOfOrder { .. })
    }
}
