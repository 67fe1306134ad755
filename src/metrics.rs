//! Prometheus metrics for tour operations and store latency.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Store call latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_latency_ms";
/// Tour operations counter metric name.
pub const METRIC_TOUR_OPERATIONS: &str = "tour_operations_total";
/// Failed tour operations counter metric name.
pub const METRIC_TOUR_FAILURES: &str = "tour_operation_failures_total";
/// Create attempts rejected for a duplicate `tour_id`.
pub const METRIC_DUPLICATE_TOUR_IDS: &str = "duplicate_tour_ids_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_STORE_LATENCY,
        "Tour store call latency in milliseconds"
    );
    describe_counter!(
        METRIC_TOUR_OPERATIONS,
        "Total number of tour operations handled"
    );
    describe_counter!(
        METRIC_TOUR_FAILURES,
        "Total number of tour operations that ended in a server error"
    );
    describe_counter!(
        METRIC_DUPLICATE_TOUR_IDS,
        "Total number of creates rejected for a duplicate tour_id"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Count one tour operation.
pub fn inc_tour_operation(operation: &'static str) {
    counter!(METRIC_TOUR_OPERATIONS, "operation" => operation).increment(1);
}

/// Count one failed tour operation.
pub fn inc_tour_failure(operation: &'static str) {
    counter!(METRIC_TOUR_FAILURES, "operation" => operation).increment(1);
}

/// Count a duplicate `tour_id` rejection.
pub fn inc_duplicate_tour_id() {
    counter!(METRIC_DUPLICATE_TOUR_IDS).increment(1);
}

/// RAII guard for timing store calls.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    operation: &'static str,
}

impl LatencyTimer {
    /// Start timing a store call.
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_STORE_LATENCY, "operation" => self.operation).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a store call.
pub fn timer_store(operation: &'static str) -> LatencyTimer {
    LatencyTimer::new(operation)
}
