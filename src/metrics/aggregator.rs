//! The shared aggregate store behind every record-* hook.
//!
//! One instance lives for the process lifetime, held by the composition
//! root and shared (via `Arc`) between request handlers and the reporter.
//! All mutation goes through a single coarse mutex: the hot path does a
//! handful of integer bumps under the lock, which is far cheaper than the
//! request work surrounding it, and it keeps the counter/window/activity
//! invariants trivially atomic with respect to snapshot and reset.

use crate::core::config::Config;
use crate::metrics::activity::ActivityRegistry;
use crate::metrics::system::SystemStats;
use crate::metrics::types::MetricsSnapshot;
use crate::metrics::window::SampleWindow;
use parking_lot::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Per-period HTTP request counters.
#[derive(Debug, Default)]
struct HttpRequestCounts {
    total: u64,
    get: u64,
    put: u64,
    post: u64,
    delete: u64,
    other: u64,
}

impl HttpRequestCounts {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-period authentication counters.
#[derive(Debug, Default)]
struct AuthAttempts {
    successful: u64,
    failed: u64,
}

impl AuthAttempts {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-period pizza business counters.
#[derive(Debug, Default)]
struct PizzaCounts {
    sold: u64,
    failures: u64,
    revenue: f64,
}

impl PizzaCounts {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Everything mutated under the aggregator lock.
#[derive(Debug)]
struct Aggregate {
    requests: HttpRequestCounts,
    auth: AuthAttempts,
    pizzas: PizzaCounts,
    service_latency: SampleWindow,
    pizza_latency: SampleWindow,
    activity: ActivityRegistry,
}

/// Process-wide metrics aggregate with per-class reset semantics.
///
/// Counters are rate metrics: zeroed by [`reset_period`] after each
/// successful export. The activity registry is a gauge: it only changes
/// through upsert/remove and the expiry sweep inside [`snapshot`].
///
/// [`reset_period`]: MetricAggregator::reset_period
/// [`snapshot`]: MetricAggregator::snapshot
pub struct MetricAggregator {
    source: String,
    activity_expiry: Duration,
    latency_retention: usize,
    inner: Mutex<Aggregate>,
}

impl MetricAggregator {
    /// Create an aggregator from configuration.
    pub fn new(config: &Config) -> Self {
        let caps = &config.aggregation;
        Self {
            source: config.collector.source.clone(),
            activity_expiry: caps.activity_expiry,
            latency_retention: caps.latency_retention,
            inner: Mutex::new(Aggregate {
                requests: HttpRequestCounts::default(),
                auth: AuthAttempts::default(),
                pizzas: PizzaCounts::default(),
                service_latency: SampleWindow::new(caps.latency_hard_cap),
                pizza_latency: SampleWindow::new(caps.latency_hard_cap),
                activity: ActivityRegistry::new(),
            }),
        }
    }

    /// Count one HTTP request. Unknown methods land in the `other` bucket.
    pub fn record_request(&self, method: &str) {
        let mut inner = self.inner.lock();
        inner.requests.total += 1;
        match method.to_ascii_uppercase().as_str() {
            "GET" => inner.requests.get += 1,
            "PUT" => inner.requests.put += 1,
            "POST" => inner.requests.post += 1,
            "DELETE" => inner.requests.delete += 1,
            _ => inner.requests.other += 1,
        }
    }

    /// Record one request's completion latency.
    pub fn record_latency(&self, duration_ms: f64) {
        self.inner.lock().service_latency.append(duration_ms);
    }

    /// Count an authentication attempt. A successful attempt with a known
    /// user id also marks that user active.
    pub fn record_auth_attempt(&self, success: bool, user_id: Option<&str>) {
        let mut inner = self.inner.lock();
        if success {
            inner.auth.successful += 1;
            if let Some(id) = user_id {
                inner.activity.upsert(id, now_ms());
            }
        } else {
            inner.auth.failed += 1;
        }
    }

    /// Mark a user active now.
    pub fn touch_activity(&self, user_id: &str) {
        self.inner.lock().activity.upsert(user_id, now_ms());
    }

    /// Forget a user's activity, e.g. on logout.
    pub fn remove_activity(&self, user_id: &str) {
        self.inner.lock().activity.remove(user_id);
    }

    /// Record a pizza purchase outcome. Latency is tracked for failures
    /// too; revenue only accrues on success.
    pub fn record_pizza_purchase(&self, success: bool, latency_ms: f64, revenue: f64) {
        let mut inner = self.inner.lock();
        if success {
            inner.pizzas.sold += 1;
            inner.pizzas.revenue += revenue;
        } else {
            inner.pizzas.failures += 1;
        }
        inner.pizza_latency.append(latency_ms);
    }

    /// Users currently considered active (last sweep's view).
    pub fn active_users(&self) -> u64 {
        self.inner.lock().activity.len() as u64
    }

    /// Produce an immutable snapshot stamped with the current wall clock.
    ///
    /// Sweeps expired activity entries as a side effect; this is the only
    /// place expiry happens. Counters are read, never mutated.
    pub fn snapshot(&self, system: SystemStats) -> MetricsSnapshot {
        self.snapshot_at(now_ms(), system)
    }

    /// Snapshot against an explicit clock. The timer path goes through
    /// [`snapshot`](Self::snapshot); callers owning their own clock (and
    /// tests exercising the expiry boundary) use this directly.
    pub fn snapshot_at(&self, now_ms: u64, system: SystemStats) -> MetricsSnapshot {
        let mut inner = self.inner.lock();

        let expired = inner.activity.sweep_expired(now_ms, self.activity_expiry);
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "expired inactive users");
        }

        MetricsSnapshot {
            source: self.source.clone(),
            timestamp_ms: now_ms,
            requests_total: inner.requests.total,
            requests_get: inner.requests.get,
            requests_put: inner.requests.put,
            requests_post: inner.requests.post,
            requests_delete: inner.requests.delete,
            requests_other: inner.requests.other,
            auth_successes: inner.auth.successful,
            auth_failures: inner.auth.failed,
            active_users: inner.activity.len() as u64,
            cpu_percent: system.cpu_percent,
            memory_percent: system.memory_percent,
            pizzas_sold: inner.pizzas.sold,
            pizza_failures: inner.pizzas.failures,
            pizza_revenue: inner.pizzas.revenue,
            service_latency_ms: inner.service_latency.average(),
            pizza_latency_ms: inner.pizza_latency.average(),
        }
    }

    /// Close out a reported period: zero every counter group and trim the
    /// latency windows to their retention cap. The activity registry is
    /// untouched, it is a gauge, not a rate.
    pub fn reset_period(&self) {
        let mut inner = self.inner.lock();
        inner.requests.reset();
        inner.auth.reset();
        inner.pizzas.reset();
        let retention = self.latency_retention;
        inner.service_latency.trim_to(retention);
        inner.pizza_latency.trim_to(retention);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigBuilder;
    use std::sync::Arc;

    fn aggregator() -> MetricAggregator {
        let config = ConfigBuilder::new().build().unwrap();
        MetricAggregator::new(&config)
    }

    #[test]
    fn test_request_counting_exactness() {
        let agg = aggregator();
        agg.record_request("GET");
        agg.record_request("get");
        agg.record_request("GET");
        agg.record_request("POST");
        agg.record_request("PATCH");

        let snap = agg.snapshot(SystemStats::default());
        assert_eq!(snap.requests_total, 5);
        assert_eq!(snap.requests_get, 3);
        assert_eq!(snap.requests_post, 1);
        assert_eq!(snap.requests_other, 1);
        assert_eq!(snap.requests_put, 0);
        assert_eq!(snap.requests_delete, 0);
    }

    #[test]
    fn test_reset_zeroes_counters_and_trims_windows() {
        let agg = aggregator();
        for _ in 0..4 {
            agg.record_request("GET");
        }
        for i in 0..120 {
            agg.record_latency(f64::from(i));
        }
        agg.record_auth_attempt(true, Some("alice"));
        agg.record_pizza_purchase(true, 90.0, 4.5);

        agg.reset_period();

        let snap = agg.snapshot(SystemStats::default());
        assert_eq!(snap.requests_total, 0);
        assert_eq!(snap.requests_get, 0);
        assert_eq!(snap.auth_successes, 0);
        assert_eq!(snap.pizzas_sold, 0);
        assert_eq!(snap.pizza_revenue, 0.0);
        // Activity is a gauge: reset must not touch it
        assert_eq!(snap.active_users, 1);

        {
            let inner = agg.inner.lock();
            assert!(inner.service_latency.len() <= 50);
            assert!(inner.pizza_latency.len() <= 50);
        }
    }

    #[test]
    fn test_pizza_purchase_scenario() {
        let agg = aggregator();
        agg.record_pizza_purchase(true, 120.0, 9.99);
        agg.record_pizza_purchase(false, 80.0, 0.0);

        let snap = agg.snapshot(SystemStats::default());
        assert_eq!(snap.pizzas_sold, 1);
        assert_eq!(snap.pizza_failures, 1);
        assert!((snap.pizza_revenue - 9.99).abs() < f64::EPSILON);
        assert_eq!(snap.pizza_latency_ms, 100);
    }

    #[test]
    fn test_activity_expiry_at_snapshot() {
        let agg = aggregator();
        agg.touch_activity("alice");
        agg.touch_activity("bob");
        assert_eq!(agg.active_users(), 2);

        // Sweep with a clock pushed past the 5 minute window
        let future = now_ms() + 5 * 60 * 1000 + 1;
        let snap = agg.snapshot_at(future, SystemStats::default());
        assert_eq!(snap.active_users, 0);
        assert_eq!(agg.active_users(), 0);
    }

    #[test]
    fn test_failed_auth_does_not_touch_activity() {
        let agg = aggregator();
        agg.record_auth_attempt(false, Some("mallory"));

        let snap = agg.snapshot(SystemStats::default());
        assert_eq!(snap.auth_failures, 1);
        assert_eq!(snap.auth_successes, 0);
        assert_eq!(snap.active_users, 0);
    }

    #[test]
    fn test_logout_removes_activity() {
        let agg = aggregator();
        agg.record_auth_attempt(true, Some("alice"));
        assert_eq!(agg.active_users(), 1);

        agg.remove_activity("alice");
        assert_eq!(agg.active_users(), 0);
    }

    #[test]
    fn test_snapshot_does_not_mutate_counters() {
        let agg = aggregator();
        agg.record_request("GET");

        let first = agg.snapshot(SystemStats::default());
        let second = agg.snapshot(SystemStats::default());
        assert_eq!(first.requests_total, second.requests_total);
    }

    #[test]
    fn test_concurrent_recording_loses_nothing() {
        let agg = Arc::new(aggregator());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let agg = Arc::clone(&agg);
            handles.push(std::thread::spawn(move || {
                for i in 0..1_000 {
                    agg.record_request(if i % 2 == 0 { "GET" } else { "POST" });
                    agg.record_latency(f64::from(i % 100));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snap = agg.snapshot(SystemStats::default());
        assert_eq!(snap.requests_total, 8_000);
        assert_eq!(snap.requests_get, 4_000);
        assert_eq!(snap.requests_post, 4_000);
    }
}
