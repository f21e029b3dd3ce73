//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, route
//! - `proxy_request_duration_seconds` (histogram): latency by route
//! - `proxy_denials_total` (counter): admission denials by reason
//! - `scoring_attempts_total` (counter): detector calls by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "Failed to install metrics exporter"),
    }
}

/// Record one completed (or rejected) request.
pub fn record_request(method: &str, status: u16, route: &str, start_time: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "route" => route.to_string())
        .record(start_time.elapsed().as_secs_f64());
}

/// Record an admission denial.
pub fn record_denial(reason: &'static str) {
    counter!("proxy_denials_total", "reason" => reason).increment(1);
}

/// Record the outcome of one detector call.
pub fn record_scoring(outcome: &'static str) {
    counter!("scoring_attempts_total", "outcome" => outcome).increment(1);
}
