//! Prometheus metrics for catalog operations

use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Once;
use tracing::error;

lazy_static::lazy_static! {
    /// Global metrics registry
    pub static ref METRICS_REGISTRY: Registry = Registry::new();

    pub static ref OPERATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("itemstore_operations_total", "Total number of catalog operations"),
        &["op", "status"]
    ).expect("valid metric definition");

    pub static ref OPERATION_DURATION: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "itemstore_operation_duration_seconds",
            "Catalog operation duration in seconds"
        ).buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["op"]
    ).expect("valid metric definition");

    pub static ref LIVE_ITEMS: IntGauge = IntGauge::new(
        "itemstore_live_items",
        "Number of live (non-deleted) items"
    ).expect("valid metric definition");
}

static INIT: Once = Once::new();

/// Register all metrics with the global registry
///
/// Safe to call more than once.
pub fn init_metrics() {
    INIT.call_once(|| {
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(OPERATIONS_TOTAL.clone()),
            Box::new(OPERATION_DURATION.clone()),
            Box::new(LIVE_ITEMS.clone()),
        ];
        for collector in collectors {
            if let Err(e) = METRICS_REGISTRY.register(collector) {
                error!(error = %e, "Failed to register metric");
            }
        }
    });
}

/// Record the outcome and duration of one operation
pub fn record_operation(op: &str, ok: bool, elapsed: std::time::Duration) {
    let status = if ok { "ok" } else { "error" };
    OPERATIONS_TOTAL.with_label_values(&[op, status]).inc();
    OPERATION_DURATION
        .with_label_values(&[op])
        .observe(elapsed.as_secs_f64());
}

/// Update the live item gauge
pub fn set_live_items(count: usize) {
    LIVE_ITEMS.set(count as i64);
}

/// Export metrics in Prometheus text format
pub fn export_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_export_contains_recorded_operations() {
        init_metrics();
        init_metrics();

        record_operation("fetch", false, Duration::from_micros(15));
        set_live_items(3);

        let text = export_metrics();
        assert!(text.contains("itemstore_operations_total"));
        assert!(text.contains("op=\"fetch\""));
        assert!(text.contains("itemstore_live_items"));
    }
}
