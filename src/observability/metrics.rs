//! Metrics collection and exposition.
//!
//! # Metrics
//! - `url_sentry_checks_total` (counter): checks by target, state
//! - `url_sentry_check_duration_seconds` (histogram): probe latency by target
//! - `url_sentry_target_up` (gauge): 1=healthy, 0=failing
//! - `url_sentry_alerts_total` (counter): alerts by target, direction, delivered
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::target::Transition;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one check.
pub fn record_check(target: &str, healthy: bool, started: Instant) {
    let state = if healthy { "ok" } else { "err" };
    counter!(
        "url_sentry_checks_total",
        "target" => target.to_string(),
        "state" => state
    )
    .increment(1);
    histogram!("url_sentry_check_duration_seconds", "target" => target.to_string())
        .record(started.elapsed().as_secs_f64());
    gauge!("url_sentry_target_up", "target" => target.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Record an alert that was composed for a transition.
pub fn record_alert(target: &str, transition: Transition, delivered: bool) {
    counter!(
        "url_sentry_alerts_total",
        "target" => target.to_string(),
        "direction" => transition.as_str(),
        "delivered" => if delivered { "true" } else { "false" }
    )
    .increment(1);
}
