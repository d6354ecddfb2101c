//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): inbound requests by service, status
//! - `http_request_duration_seconds` (histogram): inbound latency by service
//! - `downstream_calls_total` (counter): downstream calls by callee, outcome
//! - `downstream_call_duration_seconds` (histogram): time spent in a call,
//!   retries included

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one inbound request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "http_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record one downstream call (all attempts).
pub fn record_downstream_call(service: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "downstream_calls_total",
        "service" => service,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("downstream_call_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}
