//! Metrics collection and exposition.
//!
//! # Metrics
//! - `facet_router_requests_total` (counter): requests by rewrite outcome
//! - `facet_router_upstream_requests_total` (counter): forwarded requests by status
//! - `facet_router_upstream_duration_seconds` (histogram): upstream latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one routing decision (`rewritten`, `no_site`, `no_page`, ...).
pub fn record_outcome(outcome: &'static str) {
    ::metrics::counter!("facet_router_requests_total", "outcome" => outcome).increment(1);
}

/// Count one upstream exchange and its latency.
pub fn record_upstream(status: u16, start: Instant) {
    ::metrics::counter!("facet_router_upstream_requests_total", "status" => status.to_string())
        .increment(1);
    ::metrics::histogram!("facet_router_upstream_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
