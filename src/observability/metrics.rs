//! Request metrics.
//!
//! # Metrics
//! - `router_requests_total` (counter): answered requests by method, status
//! - `router_requests_dropped_total` (counter): unanswered requests by method, reason
//! - `router_request_duration_seconds` (histogram): dispatch latency by method
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a request that was answered with `status`.
pub fn record_request(method: &str, status: u16, started: Instant) {
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record a request left without a response.
pub fn record_dropped(method: &str, reason: &'static str, started: Instant) {
    counter!(
        "router_requests_dropped_total",
        "method" => method.to_string(),
        "reason" => reason
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}
