//! Active-user tracking with time-boxed expiry.
//!
//! The registry maps a user identifier to the epoch-millisecond timestamp of
//! their last authenticated request. Entries expire only during the sweep
//! that runs as part of a snapshot, never on read, so the active-user gauge
//! is stable between reporting cycles.

use std::collections::HashMap;
use std::time::Duration;

/// Mapping of user identifier to last-activity timestamp (epoch ms).
#[derive(Debug, Default)]
pub struct ActivityRegistry {
    entries: HashMap<String, u64>,
}

impl ActivityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record activity for a user, creating the entry if needed.
    pub fn upsert(&mut self, id: &str, timestamp_ms: u64) {
        self.entries.insert(id.to_string(), timestamp_ms);
    }

    /// Drop a user's entry, e.g. on logout. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        self.entries.remove(id);
    }

    /// Number of currently tracked users.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no users are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry older than `window` and return the expired ids.
    ///
    /// An entry exactly at the boundary (`now - last == window`) survives;
    /// expiry requires strictly greater staleness.
    pub fn sweep_expired(&mut self, now_ms: u64, window: Duration) -> Vec<String> {
        #[allow(clippy::cast_possible_truncation)]
        let window_ms = window.as_millis() as u64;
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, &last)| now_ms.saturating_sub(last) > window_ms)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            self.entries.remove(id);
        }

        expired
    }
}
