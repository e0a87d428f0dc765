//! Stream identity and status for the multi-stream worker.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a reframing stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StreamId(pub String);

impl StreamId {
    /// Generate a new id of the form `crop_<8 hex chars>`.
    pub fn new() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(format!("crop_{}", &simple[..8]))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    /// Admitted, waiting for a worker slot
    #[default]
    Initializing,
    /// Frames are being processed
    Processing,
    Completed,
    Failed,
    /// Aborted between frames
    Cancelled,
}

impl StreamState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamState::Initializing => "initializing",
            StreamState::Processing => "processing",
            StreamState::Completed => "completed",
            StreamState::Failed => "failed",
            StreamState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamState::Completed | StreamState::Failed | StreamState::Cancelled
        )
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Externally visible progress of a stream.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StreamStatus {
    pub stream_id: StreamId,
    pub state: StreamState,
    /// Progress percentage (0-100)
    pub progress: u8,
    pub message: String,
    pub total_frames: u64,
    pub frames_processed: u64,
    pub scene_resets: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StreamStatus {
    pub fn new(stream_id: StreamId, total_frames: u64) -> Self {
        let now = Utc::now();
        Self {
            stream_id,
            state: StreamState::Initializing,
            progress: 0,
            message: "Initializing reframing stream...".to_string(),
            total_frames,
            frames_processed: 0,
            scene_resets: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record frame progress; percentage is derived from `total_frames`.
    pub fn record_progress(&mut self, frames_processed: u64, scene_resets: u64) {
        self.frames_processed = frames_processed;
        self.scene_resets = scene_resets;
        self.progress = if self.total_frames == 0 {
            0
        } else {
            ((frames_processed.min(self.total_frames) * 100) / self.total_frames) as u8
        };
        self.updated_at = Utc::now();
    }

    pub fn transition(&mut self, state: StreamState, message: impl Into<String>) {
        self.state = state;
        self.message = message.into();
        if state == StreamState::Completed {
            self.progress = 100;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_id_format() {
        let id = StreamId::new();
        assert!(id.as_str().starts_with("crop_"));
        assert_eq!(id.as_str().len(), "crop_".len() + 8);
        assert_ne!(id, StreamId::new());
    }

    #[test]
    fn test_progress_percentage() {
        let mut status = StreamStatus::new(StreamId::from_string("crop_test"), 200);
        status.record_progress(50, 1);
        assert_eq!(status.progress, 25);
        assert_eq!(status.scene_resets, 1);

        status.transition(StreamState::Completed, "done");
        assert_eq!(status.progress, 100);
        assert!(status.state.is_terminal());
    }

    #[test]
    fn test_state_serde() {
        let json = serde_json::to_string(&StreamState::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
