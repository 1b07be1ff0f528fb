//! Core building blocks shared by the whole crate.
//!
//! Configuration handling and the error taxonomy live here; everything
//! else in the crate builds on top of these types.

#![warn(missing_docs)]

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{AggregationConfig, CollectorConfig, Config, ConfigBuilder, ReportingConfig};
pub use error::{MetricsError, Result};
