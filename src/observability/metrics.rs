//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, outcome
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_upstream_attempts_total` (counter): dispatch attempts
//! - `proxy_upstream_retries_total` (counter): retries
//! - `proxy_upstream_exhausted_total` (counter): requests that ran out of retries
//! - `proxy_auth_rejections_total` (counter): 407s from the access gate
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter only starts when an address is configured
//! - Label values come from closed sets. The service segment is chosen by
//!   the client, so it only appears in logs, never in a label

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Label for a request method. Extension methods share one label.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}

/// Record one completed inbound request.
pub fn record_request(method: &Method, status: u16, outcome: &'static str, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method_label(method),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_attempt() {
    counter!("proxy_upstream_attempts_total").increment(1);
}

pub fn record_retry() {
    counter!("proxy_upstream_retries_total").increment(1);
}

pub fn record_exhausted() {
    counter!("proxy_upstream_exhausted_total").increment(1);
}

pub fn record_auth_rejection() {
    counter!("proxy_auth_rejections_total").increment(1);
}
