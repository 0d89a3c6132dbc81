//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gemini_proxy_requests_total` (counter): requests by outcome and status
//! - `gemini_proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `gemini_proxy_upstream_duration_seconds` (histogram): upstream call latency
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished proxy request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    counter!(
        "gemini_proxy_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gemini_proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record the latency of one upstream call.
pub fn record_upstream_duration(status: u16, start: Instant) {
    histogram!(
        "gemini_proxy_upstream_duration_seconds",
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
