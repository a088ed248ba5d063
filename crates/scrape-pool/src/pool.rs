//! [`Pool`] — C4, a bounded FIFO of interchangeable scraper instances for
//! one backend kind.
//!
//! Grounded on `tower-resilience-bulkhead`'s owned-`Semaphore` concurrency
//! gate, generalized from "gate concurrency on an existing service" to
//! "manage a bounded, lazily-grown FIFO of actual instances conforming to
//! [`crate::ScraperContract`]" — bulkhead never owned a resource, only
//! counted permits; a scraper pool has to hand back the *same* instance a
//! caller released, complete with whatever `reset()` clears.

use crate::config::PoolConfig;
use crate::contract::{ScraperContract, ScraperFactory};
use crate::error::PoolError;
use crate::events::PoolEvent;
use scrape_core::events::EventListeners;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

/// A leased instance. Must be handed back to [`Pool::release`] when the
/// caller is done with it — there is no implicit return-on-drop, matching
/// the explicit `finally: await pool.release(scraper)` shape the source
/// uses (spec.md §4.4's `release(instance)`).
pub struct PoolLease {
    pub instance: Box<dyn ScraperContract>,
    permit: OwnedSemaphorePermit,
}

/// Bounded pool of scraper instances for one backend kind.
///
/// `max_instances` instances exist for the life of the pool; callers
/// beyond that bound wait (bounded by `acquire_timeout`) rather than
/// spawning unbounded instances (spec.md §4.4).
pub struct Pool {
    kind: String,
    config: PoolConfig,
    factory: Arc<dyn ScraperFactory>,
    available: Mutex<VecDeque<Box<dyn ScraperContract>>>,
    created: AtomicUsize,
    semaphore: Arc<Semaphore>,
    events: EventListeners<PoolEvent>,
}

impl Pool {
    pub fn new(kind: impl Into<String>, factory: Arc<dyn ScraperFactory>, config: PoolConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_instances));
        Self {
            kind: kind.into(),
            config,
            factory,
            available: Mutex::new(VecDeque::new()),
            created: AtomicUsize::new(0),
            semaphore,
            events: EventListeners::new(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: scrape_core::events::EventListener<PoolEvent> + 'static,
    {
        self.events.add(listener);
    }

    /// Eagerly creates `min(2, max_instances)` instances so the first
    /// wave of tasks doesn't pay construction latency (spec.md §4.4).
    pub async fn warm_up(&self) {
        let eager = self.config.eager_instances();
        let mut available = self.available.lock().await;
        while available.len() < eager {
            available.push_back(self.create_instance().await);
        }
    }

    async fn create_instance(&self) -> Box<dyn ScraperContract> {
        let instance = self.factory.create().await;
        let total = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        self.events.emit(&PoolEvent::InstanceCreated {
            kind: self.kind.clone(),
            timestamp: Instant::now(),
            total_created: total,
        });
        instance
    }

    /// `acquire(timeout)`: returns a leased instance, creating one lazily
    /// if the FIFO is empty and the pool hasn't hit `max_instances` yet;
    /// otherwise waits for a release, bounded by `config.acquire_timeout`.
    pub async fn acquire(&self) -> Result<PoolLease, PoolError> {
        let permit = match tokio::time::timeout(
            self.config.acquire_timeout,
            Arc::clone(&self.semaphore).acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            _ => {
                self.events.emit(&PoolEvent::Exhausted {
                    kind: self.kind.clone(),
                    timestamp: Instant::now(),
                });
                return Err(PoolError::PoolExhausted {
                    kind: self.kind.clone(),
                    timeout_ms: self.config.acquire_timeout.as_millis() as u64,
                });
            }
        };

        let instance = {
            let mut available = self.available.lock().await;
            match available.pop_front() {
                Some(instance) => instance,
                None => self.create_instance().await,
            }
        };

        let in_use = self.config.max_instances - self.semaphore.available_permits();
        self.events.emit(&PoolEvent::Acquired {
            kind: self.kind.clone(),
            timestamp: Instant::now(),
            in_use,
        });

        Ok(PoolLease { instance, permit })
    }

    /// Clears per-call state via `reset()` and returns the instance to the
    /// FIFO; the lease's permit drops at the end of this call, freeing the
    /// slot for the next `acquire`.
    pub async fn release(&self, lease: PoolLease) {
        lease.instance.reset().await;
        let mut available = self.available.lock().await;
        available.push_back(lease.instance);
        drop(available);

        let in_use = self.config.max_instances - self.semaphore.available_permits() - 1;
        self.events.emit(&PoolEvent::Released {
            kind: self.kind.clone(),
            timestamp: Instant::now(),
            in_use,
        });
        // lease.permit drops here, releasing the concurrency slot.
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn max_instances(&self) -> usize {
        self.config.max_instances
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn in_use_count(&self) -> usize {
        self.config.max_instances - self.semaphore.available_permits()
    }
}
