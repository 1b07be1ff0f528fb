//! Snapshot value types shared between the aggregator and the exporter.

use serde::Serialize;

/// Immutable point-in-time read of the aggregate store.
///
/// Produced once per reporting cycle by [`MetricAggregator::snapshot`],
/// consumed once by the OTLP encoder, then discarded.
///
/// [`MetricAggregator::snapshot`]: crate::metrics::MetricAggregator::snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Deployment label attached to every exported gauge.
    pub source: String,
    /// Snapshot time, epoch milliseconds.
    pub timestamp_ms: u64,

    /// Total HTTP requests this period.
    pub requests_total: u64,
    /// GET requests this period.
    pub requests_get: u64,
    /// PUT requests this period.
    pub requests_put: u64,
    /// POST requests this period.
    pub requests_post: u64,
    /// DELETE requests this period.
    pub requests_delete: u64,
    /// Requests with any other method this period.
    pub requests_other: u64,

    /// Successful authentication attempts this period.
    pub auth_successes: u64,
    /// Failed authentication attempts this period.
    pub auth_failures: u64,

    /// Users active within the expiry window (gauge, survives resets).
    pub active_users: u64,

    /// Host CPU utilization percent at snapshot time.
    pub cpu_percent: f64,
    /// Host memory utilization percent at snapshot time.
    pub memory_percent: f64,

    /// Pizzas sold this period.
    pub pizzas_sold: u64,
    /// Failed pizza purchases this period.
    pub pizza_failures: u64,
    /// Revenue from pizzas sold this period.
    pub pizza_revenue: f64,

    /// Rounded mean request latency over the retained window, ms.
    pub service_latency_ms: u64,
    /// Rounded mean pizza-creation latency over the retained window, ms.
    pub pizza_latency_ms: u64,
}
