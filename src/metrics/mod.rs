use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order creation and edits
// - Status transitions (by from/to status)
// - Rejected requests (by operation and reason)
// - Order service operation latency
//
// All metrics are registered with Prometheus and served on /metrics.
// ============================================================================

/// Central metrics registry for the order service
pub struct Metrics {
    registry: Registry,

    pub orders_created: IntCounter,
    pub order_edits: IntCounter,
    pub order_transitions: IntCounterVec,
    pub requests_rejected: IntCounterVec,
    pub operation_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_edits = IntCounter::new("order_edits_total", "Total accepted order edits")?;
        registry.register(Box::new(order_edits.clone()))?;

        let order_transitions = IntCounterVec::new(
            Opts::new("order_transitions_total", "Accepted order status transitions"),
            &["from", "to"],
        )?;
        registry.register(Box::new(order_transitions.clone()))?;

        let requests_rejected = IntCounterVec::new(
            Opts::new("order_requests_rejected_total", "Order requests that failed"),
            &["operation", "reason"],
        )?;
        registry.register(Box::new(requests_rejected.clone()))?;

        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "order_operation_duration_seconds",
                "Order service operation duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_edits,
            order_transitions,
            requests_rejected,
            operation_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_transition(&self, from: &str, to: &str) {
        self.order_transitions.with_label_values(&[from, to]).inc();
    }

    pub fn record_rejection(&self, operation: &str, reason: &str) {
        self.requests_rejected.with_label_values(&[operation, reason]).inc();
    }

    pub fn observe_duration(&self, operation: &str, duration_secs: f64) {
        self.operation_duration
            .with_label_values(&[operation])
            .observe(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        metrics.observe_duration("create_order", 0.01);
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_record_transition() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transition("Created", "Paid");
        metrics.record_transition("Paid", "Collect");

        let gathered = metrics.registry.gather();
        let transitions = gathered
            .iter()
            .find(|m| m.name() == "order_transitions_total")
            .unwrap();
        assert_eq!(transitions.metric.len(), 2);
    }

    #[test]
    fn test_record_rejection() {
        let metrics = Metrics::new().unwrap();
        metrics.record_rejection("transition_status", "too_late_to_cancel");
        metrics.record_rejection("transition_status", "too_late_to_cancel");

        let gathered = metrics.registry.gather();
        let rejected = gathered
            .iter()
            .find(|m| m.name() == "order_requests_rejected_total")
            .unwrap();
        assert_eq!(rejected.metric[0].counter.value, Some(2.0));
    }

    #[test]
    fn test_orders_created_counter() {
        let metrics = Metrics::new().unwrap();
        metrics.orders_created.inc();

        let gathered = metrics.registry.gather();
        let created = gathered
            .iter()
            .find(|m| m.name() == "orders_created_total")
            .unwrap();
        assert_eq!(created.metric[0].counter.value, Some(1.0));
    }
}
