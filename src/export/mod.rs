//! Snapshot encoding and delivery to the remote collector.

pub mod otel;
pub mod reporter;

pub use otel::{OtelEncoder, OtelPayload};
pub use reporter::{CycleOutcome, Reporter};
