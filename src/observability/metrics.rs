//! Metrics collection and exposition.
//!
//! # Metrics
//! - `patroniglue_cache_lookups_total` (counter): lookups by key and hit/miss
//! - `patroniglue_cache_evictions_total` (counter): entries removed by sweeps
//! - `patroniglue_upstream_requests_total` (counter): backend probes by key and outcome
//! - `patroniglue_probes_total` (counter): frontend responses by key and status

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_cache_lookup(key: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("patroniglue_cache_lookups_total", "key" => key, "result" => result).increment(1);
}

pub fn record_cache_evictions(count: usize) {
    counter!("patroniglue_cache_evictions_total").increment(count as u64);
}

/// `outcome` is `"true"`, `"false"` or `"error"`.
pub fn record_upstream_request(key: &'static str, outcome: &'static str) {
    counter!("patroniglue_upstream_requests_total", "key" => key, "outcome" => outcome).increment(1);
}

pub fn record_probe(key: &'static str, status: u16) {
    counter!("patroniglue_probes_total", "key" => key, "status" => status.to_string()).increment(1);
}
