//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_dispatch_total` (counter): dispatches by endpoint, status
//! - `gateway_dispatch_duration_seconds` (histogram): dispatch latency by endpoint
//! - `gateway_routes_registered` (gauge): routes derived at startup

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(endpoint: &'static str, status: u16, start_time: Instant) {
    ::metrics::counter!(
        "gateway_dispatch_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_dispatch_duration_seconds", "endpoint" => endpoint)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record how many routes the deriver produced.
pub fn record_routes(count: usize) {
    ::metrics::gauge!("gateway_routes_registered").set(count as f64);
}
