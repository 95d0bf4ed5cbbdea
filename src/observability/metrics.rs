//! Metrics collection and exposition.
//!
//! # Metrics
//! - `locale_resolutions_total` (counter): resolved locales by source
//! - `locale_redirects_total` (counter): redirects by reason
//! - `prefix_rewrites_total` (counter): stripped prefixes by mode
//! - `prefix_errors_total` (counter): prefix configuration errors by kind
//! - `proxy_requests_total` (counter): forwarded requests by method, status
//! - `proxy_request_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op (unit tests rely on this)
//! - Prometheus exposition is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_locale_resolution(source: &'static str) {
    counter!("locale_resolutions_total", "source" => source).increment(1);
}

pub fn record_redirect(reason: &'static str) {
    counter!("locale_redirects_total", "reason" => reason).increment(1);
}

pub fn record_prefix_rewrite(mode: &'static str) {
    counter!("prefix_rewrites_total", "mode" => mode).increment(1);
}

pub fn record_prefix_error(kind: &'static str) {
    counter!("prefix_errors_total", "kind" => kind).increment(1);
}

/// Record a forwarded request and its duration since `start`.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("proxy_requests_total", &labels).increment(1);
    histogram!("proxy_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}
