//! Stream status registry.
//!
//! Externally visible stream statuses, synchronized separately from the
//! engines themselves. Terminal entries are kept for a retention window so
//! callers can poll results after completion.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use vclip_models::{StreamId, StreamState, StreamStatus};

/// Shared map of stream statuses.
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    statuses: Arc<RwLock<HashMap<StreamId, StreamStatus>>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly admitted stream.
    pub async fn register(&self, stream_id: &StreamId, total_frames: u64) {
        let status = StreamStatus::new(stream_id.clone(), total_frames);
        self.statuses.write().await.insert(stream_id.clone(), status);
    }

    pub async fn get(&self, stream_id: &StreamId) -> Option<StreamStatus> {
        self.statuses.read().await.get(stream_id).cloned()
    }

    /// Streams that have not reached a terminal state, oldest first.
    pub async fn list_active(&self) -> Vec<StreamStatus> {
        let mut active: Vec<StreamStatus> = self
            .statuses
            .read()
            .await
            .values()
            .filter(|s| !s.state.is_terminal())
            .cloned()
            .collect();
        active.sort_by_key(|s| s.created_at);
        active
    }

    pub async fn len(&self) -> usize {
        self.statuses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.statuses.read().await.is_empty()
    }

    /// Move a stream to `state`. Unknown ids are ignored.
    pub async fn transition(&self, stream_id: &StreamId, state: StreamState, message: impl Into<String>) {
        if let Some(status) = self.statuses.write().await.get_mut(stream_id) {
            status.transition(state, message);
        }
    }

    /// Record progress from a blocking worker thread.
    ///
    /// Must not be called from async context.
    pub fn blocking_record_progress(&self, stream_id: &StreamId, frames_processed: u64, scene_resets: u64) {
        if let Some(status) = self.statuses.blocking_write().get_mut(stream_id) {
            status.record_progress(frames_processed, scene_resets);
        }
    }

    /// Record progress from async context.
    pub async fn record_progress(&self, stream_id: &StreamId, frames_processed: u64, scene_resets: u64) {
        if let Some(status) = self.statuses.write().await.get_mut(stream_id) {
            status.record_progress(frames_processed, scene_resets);
        }
    }

    /// Remove terminal entries last updated more than `max_age` ago.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_completed(&self, max_age: Duration) -> usize {
        let cutoff = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age));

        let mut statuses = self.statuses.write().await;
        let before = statuses.len();
        statuses.retain(|_, status| {
            let expired = match cutoff {
                Some(cutoff) => status.updated_at < cutoff,
                None => false,
            };
            !(status.state.is_terminal() && expired)
        });
        let removed = before - statuses.len();

        if removed > 0 {
            debug!(removed, remaining = statuses.len(), "Cleaned up stream statuses");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_transition() {
        let registry = StatusRegistry::new();
        let id = StreamId::new();
        registry.register(&id, 50).await;

        let status = registry.get(&id).await.unwrap();
        assert_eq!(status.state, StreamState::Initializing);
        assert_eq!(status.total_frames, 50);

        registry.record_progress(&id, 25, 1).await;
        registry.transition(&id, StreamState::Processing, "Processing frames").await;
        let status = registry.get(&id).await.unwrap();
        assert_eq!(status.progress, 50);
        assert_eq!(status.scene_resets, 1);

        registry.transition(&id, StreamState::Completed, "done").await;
        assert_eq!(registry.get(&id).await.unwrap().progress, 100);
    }

    #[tokio::test]
    async fn test_list_active_excludes_terminal() {
        let registry = StatusRegistry::new();
        let running = StreamId::new();
        let finished = StreamId::new();
        registry.register(&running, 10).await;
        registry.register(&finished, 10).await;
        registry.transition(&finished, StreamState::Failed, "boom").await;

        let active = registry.list_active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].stream_id, running);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_old_terminal_entries() {
        let registry = StatusRegistry::new();
        let old_done = StreamId::new();
        let fresh_done = StreamId::new();
        let old_running = StreamId::new();
        for id in [&old_done, &fresh_done, &old_running] {
            registry.register(id, 10).await;
        }
        registry.transition(&old_done, StreamState::Completed, "done").await;
        registry.transition(&fresh_done, StreamState::Cancelled, "cancelled").await;

        {
            let mut statuses = registry.statuses.write().await;
            let past = Utc::now() - chrono::Duration::hours(25);
            statuses.get_mut(&old_done).unwrap().updated_at = past;
            statuses.get_mut(&old_running).unwrap().updated_at = past;
        }

        let removed = registry.cleanup_completed(Duration::from_secs(24 * 3600)).await;
        assert_eq!(removed, 1);
        assert!(registry.get(&old_done).await.is_none());
        assert!(registry.get(&fresh_done).await.is_some());
        assert!(registry.get(&old_running).await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_ignored() {
        let registry = StatusRegistry::new();
        registry.transition(&StreamId::new(), StreamState::Completed, "done").await;
        assert!(registry.is_empty().await);
    }
}
