//! Pool configuration (spec.md §4.4, §6).

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on instances this pool will ever hold, configurable per
    /// backend kind (`scraper_pool_sizes` in spec.md §6, e.g. 30 for the
    /// metered API, 15 for company pages).
    pub max_instances: usize,
    /// `acquire(timeout)`'s bound on how long a caller waits for a free
    /// instance when the pool is at capacity (spec.md §5: "pool `acquire`
    /// deadline (default 30s)").
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    pub fn new(max_instances: usize) -> Self {
        Self {
            max_instances: max_instances.max(1),
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// "start with min(2, max) eager instances" (spec.md §4.4).
    pub fn eager_instances(&self) -> usize {
        self.max_instances.min(2)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(10)
    }
}
