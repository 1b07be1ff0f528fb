//! In-memory metrics aggregation.
//!
//! Request handlers and business events feed the [`MetricAggregator`]
//! through cheap, non-blocking record-* calls; the reporter drains it once
//! per cycle via [`MetricAggregator::snapshot`]. Counters reset after each
//! successful export, gauges (active users, host stats) persist across
//! periods.

pub mod activity;
pub mod aggregator;
pub mod system;
pub mod types;
pub mod window;

pub use activity::ActivityRegistry;
pub use aggregator::MetricAggregator;
pub use system::{SystemSampler, SystemStats};
pub use types::MetricsSnapshot;
pub use window::SampleWindow;
