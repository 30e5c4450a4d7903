//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fault_proxy_requests_total` (counter): requests entering the injector stack
//! - `fault_proxy_aborts_total` (counter): connections dropped by a reject injector
//! - `fault_injector_events_total` (counter): reporter events by injector and state
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::injector::InjectorState;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request() {
    counter!("fault_proxy_requests_total").increment(1);
}

pub fn record_abort() {
    counter!("fault_proxy_aborts_total").increment(1);
}

pub fn record_injector_state(injector: &str, state: InjectorState) {
    counter!(
        "fault_injector_events_total",
        "injector" => injector.to_string(),
        "state" => state.as_str()
    )
    .increment(1);
}
