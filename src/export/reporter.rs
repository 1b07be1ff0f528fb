//! Periodic export of the aggregate store to the remote collector.
//!
//! The reporter drives a fixed-interval cycle: sample host stats, snapshot
//! the aggregator, encode to OTLP JSON, POST to the collector. Counters
//! are reset only after a 2xx response; a failed delivery leaves them in
//! place so the next successful cycle reports the accumulated values.
//! Nothing here ever propagates an error to the request path.

use crate::core::config::{CollectorConfig, Config, ReportingConfig};
use crate::core::{MetricsError, Result};
use crate::export::otel::OtelEncoder;
use crate::metrics::{MetricAggregator, MetricsSnapshot, SystemSampler};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::interval;

/// How a single reporting cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Snapshot delivered, counters reset.
    Delivered,
    /// Encoding or delivery failed; counters kept for the next cycle.
    Failed,
    /// A previous cycle was still running; this tick was dropped.
    Skipped,
}

/// Timer-driven snapshot → encode → deliver → reset loop.
pub struct Reporter {
    aggregator: Arc<MetricAggregator>,
    sampler: Mutex<SystemSampler>,
    encoder: OtelEncoder,
    client: reqwest::Client,
    collector: CollectorConfig,
    reporting: ReportingConfig,
    in_cycle: AtomicBool,
    shutdown: AtomicBool,
}

impl Reporter {
    /// Create a reporter bound to the shared aggregator.
    pub fn new(config: &Config, aggregator: Arc<MetricAggregator>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.reporting.request_timeout)
            .build()?;

        Ok(Self {
            aggregator,
            sampler: Mutex::new(SystemSampler::new()),
            encoder: OtelEncoder::new(),
            client,
            collector: config.collector.clone(),
            reporting: config.reporting.clone(),
            in_cycle: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Spawn the periodic reporting task.
    ///
    /// The task runs until [`shutdown`](Self::shutdown) is called; it then
    /// exits at the next tick. A delivery in flight at process exit is
    /// abandoned, telemetry is best-effort by design.
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.reporting.interval);
            // The first tick of a tokio interval fires immediately; skip it
            // so the first export covers a full period.
            ticker.tick().await;

            while !self.shutdown.load(Ordering::Relaxed) {
                ticker.tick().await;
                if self.shutdown.load(Ordering::Relaxed) {
                    break;
                }
                self.run_cycle().await;
            }
            tracing::info!("metrics reporter stopped");
        })
    }

    /// Signal the reporting loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Run one reporting cycle to completion.
    ///
    /// Public so a composition root with its own scheduling (or a test)
    /// can drive cycles without the timer. Overlapping calls are dropped,
    /// never queued.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self
            .in_cycle
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            tracing::debug!("previous reporting cycle still running, dropping tick");
            return CycleOutcome::Skipped;
        }

        let outcome = self.cycle_inner().await;
        self.in_cycle.store(false, Ordering::Release);
        outcome
    }

    async fn cycle_inner(&self) -> CycleOutcome {
        // Sampling
        let system = self.sampler.lock().sample();
        let snapshot = self.aggregator.snapshot(system);

        match self.export(&snapshot).await {
            Ok(()) => {
                self.aggregator.reset_period();
                tracing::debug!(
                    requests = snapshot.requests_total,
                    pizzas = snapshot.pizzas_sold,
                    active_users = snapshot.active_users,
                    "metrics exported"
                );
                CycleOutcome::Delivered
            },
            Err(err) => {
                tracing::warn!(
                    category = err.category(),
                    recoverable = err.is_recoverable(),
                    "metrics export failed, keeping counters for next cycle: {}",
                    err
                );
                CycleOutcome::Failed
            },
        }
    }

    /// Encoding + Delivering. Either failure keeps the period's counters.
    async fn export(&self, snapshot: &MetricsSnapshot) -> Result<()> {
        let payload = self.encoder.encode(snapshot);
        let body = serde_json::to_vec(&payload)?;
        self.deliver(body).await
    }

    async fn deliver(&self, body: Vec<u8>) -> Result<()> {
        let response = self
            .client
            .post(&self.collector.url)
            .bearer_auth(&self.collector.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetricsError::Collector {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigBuilder;

    #[tokio::test]
    async fn test_unreachable_collector_is_absorbed() {
        // Nothing listens on this port; the cycle must fail quietly and
        // leave the recorded data in place.
        let config = ConfigBuilder::new()
            .collector_url("http://127.0.0.1:9/v1/metrics")
            .request_timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let aggregator = Arc::new(MetricAggregator::new(&config));
        aggregator.record_request("GET");

        let reporter = Reporter::new(&config, Arc::clone(&aggregator)).unwrap();
        let outcome = reporter.run_cycle().await;

        assert_eq!(outcome, CycleOutcome::Failed);
        let snap = aggregator.snapshot(crate::metrics::SystemStats::default());
        assert_eq!(snap.requests_total, 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_spawned_loop() {
        let config = ConfigBuilder::new()
            .collector_url("http://127.0.0.1:9/v1/metrics")
            .interval(std::time::Duration::from_secs(1))
            .build()
            .unwrap();
        let aggregator = Arc::new(MetricAggregator::new(&config));
        let reporter = Arc::new(Reporter::new(&config, aggregator).unwrap());

        let handle = Arc::clone(&reporter).spawn();
        reporter.shutdown();

        tokio::time::timeout(std::time::Duration::from_secs(3), handle)
            .await
            .expect("reporter task did not stop after shutdown")
            .unwrap();
    }
}
