//! Multi-stream reframing worker.
//!
//! This crate provides:
//! - Admission-limited stream pool with cancellation
//! - Stream status registry with retention cleanup
//! - JSON job manifests, batch runs and JSONL output
//! - Structured stream logging and Prometheus metrics

pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod metrics;
pub mod pool;
pub mod status;

pub use batch::{run_batch, BatchReport};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::StreamLogger;
pub use manifest::{write_reports, ReframeJob};
pub use metrics::init_metrics;
pub use pool::{StreamOutcome, StreamPool, StreamRequest, StreamTicket};
pub use status::StatusRegistry;
