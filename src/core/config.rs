//! Configuration management for slicewatch.
//!
//! This module provides configuration handling with:
//! - YAML file support
//! - Environment variable overrides
//! - Validation and defaults

use crate::core::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete configuration for the metrics engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote collector configuration
    pub collector: CollectorConfig,
    /// Reporting cycle configuration
    pub reporting: ReportingConfig,
    /// Aggregate store tuning
    pub aggregation: AggregationConfig,
}

/// Remote collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Collector endpoint for OTLP/HTTP metric export
    pub url: String,
    /// Bearer token sent with every export
    pub api_key: String,
    /// Label identifying this deployment in exported metrics
    pub source: String,
}

/// Reporting cycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Time between reporting cycles
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Timeout for a single delivery attempt
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

/// Aggregate store tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Hard cap on latency samples held between resets
    pub latency_hard_cap: usize,
    /// Samples kept per window after a period reset
    pub latency_retention: usize,
    /// How long a user stays "active" after their last request
    #[serde(with = "humantime_serde")]
    pub activity_expiry: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            collector: CollectorConfig::default(),
            reporting: ReportingConfig::default(),
            aggregation: AggregationConfig::default(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            url: "http://localhost:4318/v1/metrics".to_string(),
            api_key: String::new(),
            source: "pizza-service-dev".to_string(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        ReportingConfig {
            interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            latency_hard_cap: 100,
            latency_retention: 50,
            activity_expiry: Duration::from_secs(5 * 60),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Result<Self> {
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.collector.url.is_empty() {
            return Err(MetricsError::config("collector.url must not be empty"));
        }

        if self.collector.source.is_empty() {
            return Err(MetricsError::config("collector.source must not be empty"));
        }

        if self.reporting.interval < Duration::from_secs(1) {
            return Err(MetricsError::config(format!(
                "reporting.interval must be at least 1s, got {:?}",
                self.reporting.interval
            )));
        }

        if self.aggregation.latency_hard_cap == 0 {
            return Err(MetricsError::config("latency_hard_cap must be greater than 0"));
        }

        if self.aggregation.latency_retention == 0 {
            return Err(MetricsError::config("latency_retention must be greater than 0"));
        }

        if self.aggregation.latency_retention > self.aggregation.latency_hard_cap {
            return Err(MetricsError::config(format!(
                "latency_retention ({}) must not exceed latency_hard_cap ({})",
                self.aggregation.latency_retention, self.aggregation.latency_hard_cap
            )));
        }

        Ok(())
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| MetricsError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Apply environment variable overrides.
    ///
    /// `METRICS_URL`, `METRICS_API_KEY` and `METRICS_SOURCE` take precedence
    /// over whatever the YAML or defaults provided.
    pub fn from_env(mut self) -> Self {
        if let Ok(url) = std::env::var("METRICS_URL") {
            self.config.collector.url = url;
        }
        if let Ok(key) = std::env::var("METRICS_API_KEY") {
            self.config.collector.api_key = key;
        }
        if let Ok(source) = std::env::var("METRICS_SOURCE") {
            self.config.collector.source = source;
        }
        self
    }

    /// Set the collector URL
    pub fn collector_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.collector.url = url.into();
        self
    }

    /// Set the bearer token
    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.config.collector.api_key = key.into();
        self
    }

    /// Set the deployment source label
    pub fn source<S: Into<String>>(mut self, source: S) -> Self {
        self.config.collector.source = source.into();
        self
    }

    /// Set the reporting interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.reporting.interval = interval;
        self
    }

    /// Set the delivery timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.reporting.request_timeout = timeout;
        self
    }

    /// Set the activity expiry window
    pub fn activity_expiry(mut self, window: Duration) -> Self {
        self.config.aggregation.activity_expiry = window;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
