//! Host CPU and memory sampling via `sysinfo`.
//!
//! Sampled once per reporting cycle, at snapshot time. CPU utilization is
//! derived from the one-minute load average spread over the logical CPU
//! count, matching how the service's dashboards interpret saturation.

use sysinfo::System;

/// Instantaneous host utilization, both as percentages in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemStats {
    /// Load-average-derived CPU utilization percent.
    pub cpu_percent: f64,
    /// Used physical memory percent.
    pub memory_percent: f64,
}

/// Pulls instantaneous utilization facts from the host OS.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    /// Create a sampler with a fully refreshed system view.
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }

    /// Sample current CPU and memory utilization.
    ///
    /// Never fails: hosts that cannot report a fact yield 0.0 for it.
    pub fn sample(&mut self) -> SystemStats {
        self.system.refresh_memory();

        let cpu_count = self.system.cpus().len();
        let cpu_percent = if cpu_count == 0 {
            0.0
        } else {
            let load = System::load_average().one;
            (load / cpu_count as f64 * 100.0).clamp(0.0, 100.0)
        };

        let total = self.system.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let used = self.system.used_memory() as f64 / total as f64;
            (used * 100.0).clamp(0.0, 100.0)
        };

        SystemStats {
            cpu_percent,
            memory_percent,
        }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_returns_bounded_percentages() {
        let mut sampler = SystemSampler::new();
        let stats = sampler.sample();

        assert!((0.0..=100.0).contains(&stats.cpu_percent));
        assert!((0.0..=100.0).contains(&stats.memory_percent));
    }

    #[test]
    fn test_repeated_samples_do_not_panic() {
        let mut sampler = SystemSampler::new();
        for _ in 0..3 {
            let _ = sampler.sample();
        }
    }
}
