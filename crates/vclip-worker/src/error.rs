//! Worker error types.

use thiserror::Error;
use vclip_models::StreamId;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Admission rejected: {limit} streams already active")]
    AdmissionRejected { limit: usize },

    #[error("Stream {0} was cancelled")]
    Cancelled(StreamId),

    #[error("Stream failed: {0}")]
    StreamFailed(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] vclip_media::MediaError),

    #[error("Model error: {0}")]
    Model(#[from] vclip_models::ModelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn stream_failed(msg: impl Into<String>) -> Self {
        Self::StreamFailed(msg.into())
    }

    pub fn invalid_manifest(msg: impl Into<String>) -> Self {
        Self::InvalidManifest(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if the caller may retry the same request later.
    ///
    /// Only admission rejection is transient; everything else fails the
    /// same way on replay.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkerError::AdmissionRejected { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, WorkerError::Cancelled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(WorkerError::AdmissionRejected { limit: 10 }.is_retryable());
        assert!(!WorkerError::stream_failed("boom").is_retryable());
        assert!(WorkerError::Cancelled(StreamId::from_string("crop_1234abcd")).is_cancelled());
    }

    #[test]
    fn test_media_error_wraps() {
        let err: WorkerError = vclip_media::MediaError::FrameOutOfOrder {
            previous: 4,
            received: 2,
        }
        .into();
        assert!(err.to_string().contains("out of order"));
    }
}
