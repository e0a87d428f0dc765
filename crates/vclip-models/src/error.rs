//! Validation errors for shared models.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Unknown smoothing strength: {0}")]
    UnknownSmoothingStrength(String),

    #[error("Invalid smoothing config: {0}")]
    InvalidSmoothing(String),

    #[error("Invalid face box ({x0}, {y0}, {x1}, {y1})")]
    InvalidFaceBox { x0: f64, y0: f64, x1: f64, y1: f64 },

    #[error("Invalid scene span: start {start} >= end {end}")]
    InvalidSceneSpan { start: u64, end: u64 },

    #[error("Invalid target size {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },
}

impl ModelError {
    pub fn invalid_smoothing(msg: impl Into<String>) -> Self {
        Self::InvalidSmoothing(msg.into())
    }
}
