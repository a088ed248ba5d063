use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PoolError {
    /// `acquire(timeout)` elapsed with no instance available and the pool
    /// already at `max_instances` (spec.md §4.4).
    #[error("pool exhausted for {kind}: no instance available within {timeout_ms}ms")]
    PoolExhausted { kind: String, timeout_ms: u64 },
}
