//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bench_http_requests_total` (counter): requests by route, status
//! - `bench_orchestrations_total` (counter): profile workflows by outcome
//! - `bench_orchestration_duration_seconds` (histogram): workflow latency
//! - `bench_aggregations_total` (counter): aggregation batches served
//! - `bench_orders_processed_total` (counter): completed orders folded
//! - `bench_accumulators_created_total` (counter): pool misses
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16) {
    metrics::counter!(
        "bench_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_orchestration(outcome: &'static str, start: Instant) {
    metrics::counter!("bench_orchestrations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("bench_orchestration_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_aggregation(processed_orders: u32) {
    metrics::counter!("bench_aggregations_total").increment(1);
    metrics::counter!("bench_orders_processed_total").increment(u64::from(processed_orders));
}

pub fn record_accumulator_created() {
    metrics::counter!("bench_accumulators_created_total").increment(1);
}
