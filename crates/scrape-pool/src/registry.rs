//! [`PoolRegistry`] — one [`Pool`] per [`BackendKind`], owned by the
//! orchestrator (spec.md §3, §9: registries are owned values, never
//! process globals).

use crate::error::PoolError;
use crate::pool::{Pool, PoolLease};
use scrape_core::BackendKind;
use std::collections::HashMap;

#[derive(Default)]
pub struct PoolRegistry {
    pools: HashMap<BackendKind, Pool>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    pub fn insert(&mut self, kind: BackendKind, pool: Pool) {
        self.pools.insert(kind, pool);
    }

    pub fn get(&self, kind: BackendKind) -> Option<&Pool> {
        self.pools.get(&kind)
    }

    pub async fn warm_up_all(&self) {
        for pool in self.pools.values() {
            pool.warm_up().await;
        }
    }

    pub async fn acquire(&self, kind: BackendKind) -> Result<PoolLease, PoolError> {
        match self.pools.get(&kind) {
            Some(pool) => pool.acquire().await,
            None => Err(PoolError::PoolExhausted {
                kind: format!("{kind:?}"),
                timeout_ms: 0,
            }),
        }
    }

    pub async fn release(&self, kind: BackendKind, lease: PoolLease) {
        if let Some(pool) = self.pools.get(&kind) {
            pool.release(lease).await;
        }
    }
}
