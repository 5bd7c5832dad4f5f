//! Prometheus metrics for media-relay-service.
//!
//! Recording goes through the `metrics` facade, so the helpers are no-ops
//! until [`init_metrics`] installs the Prometheus recorder.

use crate::models::MediaKind;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> Result<(), AppError> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(format!("failed to install Prometheus recorder: {}", e))
    })?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| AppError::InternalError("metrics already initialized".to_string()))
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a finished relay request by media kind and outcome.
pub fn record_relay_outcome(kind: MediaKind, outcome: &'static str) {
    counter!("relay_requests_total", "kind" => kind.as_str(), "outcome" => outcome).increment(1);
}

/// Record the size of a downloaded media payload.
pub fn record_media_bytes(kind: MediaKind, bytes: usize) {
    histogram!("relay_media_bytes", "kind" => kind.as_str()).record(bytes as f64);
}
