use std::time::Duration;

/// Tuning for [`crate::monitor::HealthMonitor`] (spec.md §4.8: "every 60s").
#[derive(Debug, Clone, Copy)]
pub struct HealthConfig {
    pub tick_interval: Duration,
    /// How long a worker can go without a liveness touch before it's
    /// reported stale.
    pub worker_stale_threshold: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            worker_stale_threshold: Duration::from_secs(90),
        }
    }
}
