//! Rate limiter configuration (spec.md §4.2, §6).

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Enables the adaptive delay calculation (success-rate, response-time,
    /// block-decay multipliers). When `false`, `await` always sleeps
    /// `initial_delay`. Default: true.
    pub adaptive: bool,
    pub initial_delay: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Requests allowed within `window` before the window limiter extends
    /// the delay so the oldest request falls out of the window.
    pub window_limit: usize,
    pub window: Duration,
    pub target_success_rate: f64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            adaptive: true,
            initial_delay: Duration::from_millis(1000),
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(60_000),
            window_limit: 60,
            window: Duration::from_secs(60),
            target_success_rate: 0.95,
        }
    }
}
