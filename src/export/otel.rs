//! OTLP/HTTP JSON gauge encoding.
//!
//! Transforms a [`MetricsSnapshot`] into the collector's wire shape:
//! one resource, one scope, one gauge metric per numeric snapshot field,
//! each carrying a single data point. The transform is pure and
//! deterministic: the same snapshot always serializes to identical bytes.

use crate::metrics::MetricsSnapshot;
use serde::Serialize;

/// Instrumentation scope name reported to the collector.
const SCOPE_NAME: &str = "slicewatch";
/// Instrumentation scope version reported to the collector.
const SCOPE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level OTLP metrics payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OtelPayload {
    /// Resource groupings; always exactly one for this exporter.
    pub resource_metrics: Vec<ResourceMetrics>,
}

/// Metrics attributed to one resource.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetrics {
    /// The resource the gauges describe.
    pub resource: Resource,
    /// Per-scope metric groupings; always exactly one.
    pub scope_metrics: Vec<ScopeMetrics>,
}

/// Resource identity as OTLP key/value attributes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Resource {
    /// Identifying attributes (service name, deployment source).
    pub attributes: Vec<KeyValue>,
}

/// Metrics produced by one instrumentation scope.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScopeMetrics {
    /// The instrumentation scope.
    pub scope: Scope,
    /// One gauge per numeric snapshot field.
    pub metrics: Vec<Metric>,
}

/// Instrumentation scope identity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scope {
    /// Scope name.
    pub name: String,
    /// Scope version.
    pub version: String,
}

/// A single named gauge metric.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    /// Metric name, taken from the snapshot field.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Unit inferred from the metric name.
    pub unit: String,
    /// Gauge body holding the data points.
    pub gauge: Gauge,
}

/// Gauge data-point container.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    /// The measurements; always exactly one per cycle.
    pub data_points: Vec<DataPoint>,
}

/// One measured value with its timestamp and attributes.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Point attributes (deployment source).
    pub attributes: Vec<KeyValue>,
    /// The measurement as a double.
    pub as_double: f64,
    /// Epoch nanoseconds, serialized as a decimal string per OTLP/JSON.
    pub time_unix_nano: String,
}

/// OTLP string attribute.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeyValue {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: AttributeValue,
}

/// OTLP attribute value wrapper.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    /// String payload.
    pub string_value: String,
}

impl KeyValue {
    fn string(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: AttributeValue {
                string_value: value.to_string(),
            },
        }
    }
}

/// Stateless snapshot-to-OTLP transform.
#[derive(Debug, Default)]
pub struct OtelEncoder;

impl OtelEncoder {
    /// Create an encoder.
    pub fn new() -> Self {
        Self
    }

    /// Encode a snapshot as an OTLP gauge payload.
    pub fn encode(&self, snapshot: &MetricsSnapshot) -> OtelPayload {
        let time_unix_nano = (u128::from(snapshot.timestamp_ms) * 1_000_000).to_string();
        let point_attributes = vec![KeyValue::string("source", &snapshot.source)];

        let metrics = gauge_fields(snapshot)
            .into_iter()
            .map(|(name, description, value)| Metric {
                name: name.to_string(),
                description: description.to_string(),
                unit: unit_for(name).to_string(),
                gauge: Gauge {
                    data_points: vec![DataPoint {
                        attributes: point_attributes.clone(),
                        as_double: value,
                        time_unix_nano: time_unix_nano.clone(),
                    }],
                },
            })
            .collect();

        OtelPayload {
            resource_metrics: vec![ResourceMetrics {
                resource: Resource {
                    attributes: vec![
                        KeyValue::string("service.name", &snapshot.source),
                        KeyValue::string("service.namespace", "pizza-service"),
                    ],
                },
                scope_metrics: vec![ScopeMetrics {
                    scope: Scope {
                        name: SCOPE_NAME.to_string(),
                        version: SCOPE_VERSION.to_string(),
                    },
                    metrics,
                }],
            }],
        }
    }
}

/// Unit inference by naming convention.
fn unit_for(name: &str) -> &'static str {
    if name.contains("percent") {
        "%"
    } else if name.contains("latency") {
        "ms"
    } else if name.contains("revenue") {
        "usd"
    } else {
        "1"
    }
}

/// Every numeric snapshot field, in a fixed order, with its description.
/// `source` and the timestamp identify the snapshot and are not gauges.
#[allow(clippy::cast_precision_loss)]
fn gauge_fields(s: &MetricsSnapshot) -> Vec<(&'static str, &'static str, f64)> {
    vec![
        ("requests_total", "HTTP requests this period", s.requests_total as f64),
        ("requests_get", "GET requests this period", s.requests_get as f64),
        ("requests_put", "PUT requests this period", s.requests_put as f64),
        ("requests_post", "POST requests this period", s.requests_post as f64),
        ("requests_delete", "DELETE requests this period", s.requests_delete as f64),
        ("requests_other", "Other-method requests this period", s.requests_other as f64),
        ("auth_successes", "Successful auth attempts this period", s.auth_successes as f64),
        ("auth_failures", "Failed auth attempts this period", s.auth_failures as f64),
        ("active_users", "Users active within the expiry window", s.active_users as f64),
        ("cpu_percent", "Host CPU utilization", s.cpu_percent),
        ("memory_percent", "Host memory utilization", s.memory_percent),
        ("pizzas_sold", "Pizzas sold this period", s.pizzas_sold as f64),
        ("pizza_failures", "Failed pizza purchases this period", s.pizza_failures as f64),
        ("pizza_revenue", "Revenue this period", s.pizza_revenue),
        ("service_latency_ms", "Mean request latency", s.service_latency_ms as f64),
        ("pizza_latency_ms", "Mean pizza creation latency", s.pizza_latency_ms as f64),
    ]
}
