//! Multi-stream reframing pool.
//!
//! Streams are independent: each admitted stream owns its own
//! [`ReframingEngine`] and is processed sequentially on a blocking worker
//! slot. Two semaphores bound the pool:
//!
//! - `admission`: streams admitted at once. Submissions beyond the limit
//!   fail immediately instead of queueing.
//! - `workers`: streams actually computing at once. Admitted streams wait
//!   here for a slot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::{Semaphore, TryAcquireError};
use tokio::task::JoinHandle;
use tracing::{info, warn, Instrument};
use vclip_media::metrics;
use vclip_media::{ReframeConfig, ReframingEngine, StreamSummary};
use vclip_models::{FrameInput, FrameReport, SceneContext, StreamId, StreamState, StreamStatus};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::StreamLogger;
use crate::status::StatusRegistry;

/// Everything needed to reframe one stream.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub config: ReframeConfig,
    pub scenes: SceneContext,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Frames in strictly increasing index order
    pub frames: Vec<FrameInput>,
}

/// Result of a completed stream.
#[derive(Debug, Clone)]
pub struct StreamOutcome {
    pub stream_id: StreamId,
    pub reports: Vec<FrameReport>,
    pub summary: StreamSummary,
}

/// Handle to an admitted stream.
#[derive(Debug)]
pub struct StreamTicket {
    pub stream_id: StreamId,
    handle: JoinHandle<WorkerResult<StreamOutcome>>,
}

impl StreamTicket {
    /// Wait for the stream to finish.
    pub async fn wait(self) -> WorkerResult<StreamOutcome> {
        self.handle.await?
    }
}

type CancelFlags = Arc<Mutex<HashMap<StreamId, Arc<AtomicBool>>>>;

/// Admission-limited pool of reframing streams.
#[derive(Debug, Clone)]
pub struct StreamPool {
    config: WorkerConfig,
    admission: Arc<Semaphore>,
    workers: Arc<Semaphore>,
    registry: StatusRegistry,
    cancel_flags: CancelFlags,
}

impl StreamPool {
    pub fn new(config: WorkerConfig) -> Self {
        Self::with_registry(config, StatusRegistry::new())
    }

    pub fn with_registry(config: WorkerConfig, registry: StatusRegistry) -> Self {
        let max_streams = config.max_concurrent_streams.max(1);
        let max_workers = config.max_workers.max(1);
        Self {
            admission: Arc::new(Semaphore::new(max_streams)),
            workers: Arc::new(Semaphore::new(max_workers)),
            config,
            registry,
            cancel_flags: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn registry(&self) -> &StatusRegistry {
        &self.registry
    }

    /// Streams currently admitted (running or waiting for a slot).
    pub fn active_streams(&self) -> usize {
        self.config.max_concurrent_streams.max(1) - self.admission.available_permits()
    }

    /// Admit a stream or reject it immediately when the pool is full.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn submit(&self, request: StreamRequest) -> WorkerResult<StreamTicket> {
        let admission = match self.admission.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                metrics::record_stream_rejected();
                warn!(
                    limit = self.config.max_concurrent_streams,
                    "Rejecting stream: admission limit reached"
                );
                return Err(WorkerError::AdmissionRejected {
                    limit: self.config.max_concurrent_streams,
                });
            }
            Err(TryAcquireError::Closed) => {
                return Err(WorkerError::stream_failed("stream pool is closed"));
            }
        };

        let stream_id = StreamId::new();
        let cancel = Arc::new(AtomicBool::new(false));
        self.lock_flags().insert(stream_id.clone(), Arc::clone(&cancel));
        self.registry
            .register(&stream_id, request.frames.len() as u64)
            .await;
        metrics::set_active_streams(self.active_streams());

        let logger = StreamLogger::new(&stream_id, request.frames.len() as u64);
        logger.admitted(request.frame_width, request.frame_height);

        let pool = self.clone();
        let id = stream_id.clone();
        let span = logger.create_span();
        let handle = tokio::spawn(
            async move {
                let _admission = admission;
                let started = Instant::now();
                let result = pool.run_stream(&id, request, cancel, &logger).await;
                pool.finish(&id, &result, started, &logger).await;
                result
            }
            .instrument(span),
        );

        Ok(StreamTicket { stream_id, handle })
    }

    /// Request cancellation; takes effect before the next frame.
    ///
    /// Returns `false` if the stream is unknown or already finished.
    pub fn cancel(&self, stream_id: &StreamId) -> bool {
        match self.lock_flags().get(stream_id) {
            Some(flag) => {
                flag.store(true, Ordering::SeqCst);
                info!(stream_id = %stream_id, "Cancellation requested");
                true
            }
            None => false,
        }
    }

    pub async fn status(&self, stream_id: &StreamId) -> Option<StreamStatus> {
        self.registry.get(stream_id).await
    }

    /// Drop terminal statuses older than the configured retention.
    pub async fn cleanup_completed(&self) -> usize {
        self.registry
            .cleanup_completed(self.config.status_retention)
            .await
    }

    async fn run_stream(
        &self,
        stream_id: &StreamId,
        request: StreamRequest,
        cancel: Arc<AtomicBool>,
        logger: &StreamLogger,
    ) -> WorkerResult<StreamOutcome> {
        let _slot = self
            .workers
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| WorkerError::stream_failed("worker pool is closed"))?;

        if cancel.load(Ordering::SeqCst) {
            return Err(WorkerError::Cancelled(stream_id.clone()));
        }

        self.registry
            .transition(stream_id, StreamState::Processing, "Processing frames")
            .await;

        let registry = self.registry.clone();
        let id = stream_id.clone();
        let interval = self.config.progress_interval_frames.max(1);
        let logger = logger.clone();
        let span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            process_frames(&id, request, &cancel, &registry, &logger, interval)
        })
        .await?
    }

    async fn finish(
        &self,
        stream_id: &StreamId,
        result: &WorkerResult<StreamOutcome>,
        started: Instant,
        logger: &StreamLogger,
    ) {
        self.lock_flags().remove(stream_id);
        let elapsed = started.elapsed();

        let state = match result {
            Ok(outcome) => {
                let summary = &outcome.summary;
                self.registry
                    .record_progress(stream_id, summary.frames_processed, summary.scene_resets)
                    .await;
                let message = format!(
                    "{} frames, {} resets, {} dual",
                    summary.frames_processed, summary.scene_resets, summary.dual_frames
                );
                self.registry
                    .transition(stream_id, StreamState::Completed, message)
                    .await;
                logger.completed(summary, elapsed);
                StreamState::Completed
            }
            Err(WorkerError::Cancelled(_)) => {
                self.registry
                    .transition(stream_id, StreamState::Cancelled, "Cancelled")
                    .await;
                logger.cancelled(elapsed);
                StreamState::Cancelled
            }
            Err(e) => {
                self.registry
                    .transition(stream_id, StreamState::Failed, e.to_string())
                    .await;
                logger.failed(e, elapsed);
                StreamState::Failed
            }
        };

        metrics::record_stream_duration(state.as_str(), elapsed.as_secs_f64());
        // The admission permit is still held here; it is released when the task ends.
        metrics::set_active_streams(self.active_streams().saturating_sub(1));
    }

    fn lock_flags(&self) -> std::sync::MutexGuard<'_, HashMap<StreamId, Arc<AtomicBool>>> {
        self.cancel_flags
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Sequential per-stream loop; runs on a blocking thread.
fn process_frames(
    stream_id: &StreamId,
    request: StreamRequest,
    cancel: &AtomicBool,
    registry: &StatusRegistry,
    logger: &StreamLogger,
    progress_interval: u64,
) -> WorkerResult<StreamOutcome> {
    let mut engine = ReframingEngine::new(request.config, request.scenes)?;
    let mut reports = Vec::with_capacity(request.frames.len());

    for frame in &request.frames {
        if cancel.load(Ordering::SeqCst) {
            return Err(WorkerError::Cancelled(stream_id.clone()));
        }

        reports.push(engine.process_frame(frame, request.frame_width, request.frame_height)?);

        let done = reports.len() as u64;
        if done % progress_interval == 0 {
            let summary = engine.summary();
            registry.blocking_record_progress(stream_id, done, summary.scene_resets);
            logger.progress(summary);
        }
    }

    Ok(StreamOutcome {
        stream_id: stream_id.clone(),
        reports,
        summary: engine.close(),
    })
}
