//! slicewatch - metrics aggregation and OTLP reporting for the pizza service.
//!
//! slicewatch is the telemetry subsystem of a pizza-ordering backend: an
//! in-memory aggregate store written by every inbound request and business
//! event, flushed on a fixed timer to a remote OpenTelemetry collector as
//! OTLP/HTTP JSON gauges.
//!
//! # Semantics
//!
//! - **Rate metrics** (request, auth and pizza counters) accumulate within
//!   a period and reset exactly once, after a successful export.
//! - **Gauge metrics** (active users, host CPU/memory) persist across
//!   periods; active users expire only during the snapshot sweep.
//! - **Failure policy**: a failed delivery keeps all counters, so the next
//!   successful cycle reports the conflated multi-period totals. Telemetry
//!   never surfaces an error to the request path.
//!
//! # Example
//!
//! ```no_run
//! use slicewatch::core::ConfigBuilder;
//! use slicewatch::export::Reporter;
//! use slicewatch::metrics::MetricAggregator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigBuilder::new().from_env().build()?;
//!     let aggregator = Arc::new(MetricAggregator::new(&config));
//!     let reporter = Arc::new(Reporter::new(&config, Arc::clone(&aggregator))?);
//!     let _task = Arc::clone(&reporter).spawn();
//!
//!     // Request handlers share the aggregator:
//!     aggregator.record_request("GET");
//!     aggregator.record_latency(12.0);
//!
//!     reporter.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod core;
pub mod export;
pub mod metrics;

// Re-export core types for convenience
pub use crate::core::{Config, MetricsError, Result};
pub use crate::export::Reporter;
pub use crate::metrics::MetricAggregator;
