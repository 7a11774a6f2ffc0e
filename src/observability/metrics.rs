//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tenant_router_decisions_total` (counter): decisions by kind and rule
//! - `tenant_router_request_duration_seconds` (histogram): time to decide
//! - `tenant_router_rejected_total` (counter): failed requests by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(
        "tenant_router_decisions_total",
        "Routing decisions by decision kind and rule"
    );
    describe_histogram!(
        "tenant_router_request_duration_seconds",
        "Time from request arrival to routing decision"
    );
    describe_counter!(
        "tenant_router_rejected_total",
        "Requests answered with an error"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_decision(decision: &'static str, rule: &'static str, start: Instant) {
    counter!("tenant_router_decisions_total", "decision" => decision, "rule" => rule).increment(1);
    histogram!("tenant_router_request_duration_seconds", "decision" => decision)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rejection(reason: &'static str) {
    counter!("tenant_router_rejected_total", "reason" => reason).increment(1);
}
