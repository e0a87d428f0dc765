//! Prometheus recorder for the worker binary.
//!
//! Metric names and recording helpers live in `vclip_media::metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::{WorkerError, WorkerResult};

pub use vclip_media::metrics::names;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> WorkerResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| WorkerError::config_error(format!("failed to install Prometheus recorder: {e}")))
}
