//! Bounded FIFO window for latency samples.
//!
//! Recording enforces a hard cap (oldest sample evicted), while a period
//! reset trims the window down to a smaller retention cap so the next
//! period's average still has some history to start from.

use std::collections::VecDeque;

/// Bounded ordered sequence of latency samples in milliseconds.
#[derive(Debug)]
pub struct SampleWindow {
    samples: VecDeque<f64>,
    hard_cap: usize,
}

impl SampleWindow {
    /// Create a window that never holds more than `hard_cap` samples.
    pub fn new(hard_cap: usize) -> Self {
        assert!(hard_cap > 0, "hard_cap must be greater than 0");
        Self {
            samples: VecDeque::with_capacity(hard_cap),
            hard_cap,
        }
    }

    /// Append a sample, evicting the oldest when the window is full.
    pub fn append(&mut self, value: f64) {
        if self.samples.len() == self.hard_cap {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Arithmetic mean rounded to the nearest integer, 0 when empty.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn average(&self) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }
        let sum: f64 = self.samples.iter().sum();
        (sum / self.samples.len() as f64).round() as u64
    }

    /// Keep only the most recent `retention_cap` samples.
    pub fn trim_to(&mut self, retention_cap: usize) {
        while self.samples.len() > retention_cap {
            self.samples.pop_front();
        }
    }

    /// Current number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
