//! [`OrchestratorHandler`] — the [`TaskHandler`] C6's workers dispatch
//! through (spec.md §4.7's `executeTask`): resolve the domain key, gate on
//! C1/C2/C3, lease an instance from C4, scrape under the configured
//! deadline, record the outcome back into C1/C2, and release the lease.
//!
//! Everything past a single scrape's outcome — dedup, publication,
//! rolling-metric bookkeeping, domain-health tracking — happens one layer
//! up, in [`crate::orchestrator::Orchestrator`]'s event-draining loop,
//! which observes the same [`scrape_workers::WorkerEvent`] stream this
//! handler's return value feeds. Keeping that out of here means this type
//! only needs a handle on C1-C4, not C7/C8/C9 as well.

use crate::backend::{quota_fallback_backend, select_backend};
use crate::domain::resolve_domain;
use crate::hybrid;
use async_trait::async_trait;
use scrape_circuitbreaker::{CircuitState, Registry};
use scrape_core::{BackendKind, ScrapeError, ScrapeOutcome, ScrapeRequest, Task};
use scrape_pool::PoolRegistry;
use scrape_quota::QuotaLedger;
use scrape_ratelimiter::RateLimiter;
use scrape_workers::TaskHandler;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// The subset of [`crate::config::OrchestratorConfig`] this handler reads
/// on every call, copied out so it doesn't need a borrow of the whole
/// config across `.await` points.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub use_metered_first: bool,
    pub metered_domain: String,
    pub scrape_deadline: Duration,
}

pub struct OrchestratorHandler {
    settings: HandlerSettings,
    registry: Arc<Registry>,
    rate_limiter: Arc<RateLimiter>,
    quota: Arc<QuotaLedger>,
    pools: Arc<PoolRegistry>,
}

impl OrchestratorHandler {
    pub fn new(
        settings: HandlerSettings,
        registry: Arc<Registry>,
        rate_limiter: Arc<RateLimiter>,
        quota: Arc<QuotaLedger>,
        pools: Arc<PoolRegistry>,
    ) -> Self {
        Self {
            settings,
            registry,
            rate_limiter,
            quota,
            pools,
        }
    }

    /// Steps 1-4 of `selectBackend` plus the gates that need live state
    /// (spec.md §4.7): domain resolution, the circuit reading that feeds
    /// step 2, and the quota snapshot that feeds step 4.
    async fn choose_backend(&self, task: &Task, domain: &str) -> BackendKind {
        let circuit_open = self.registry.state_of(domain).await == CircuitState::Open;
        let quota_available = self.quota.snapshot().await.remaining > 0;
        select_backend(task, self.settings.use_metered_first, circuit_open, quota_available)
    }

    /// One gate-scrape-record cycle against a single backend kind. Used
    /// directly for the primary pass, and a second time for a hybrid
    /// task's depth pass against its native backend.
    async fn run_pass(
        &self,
        task: &Task,
        domain: &str,
        backend: BackendKind,
        cancel: CancellationToken,
    ) -> Result<ScrapeOutcome, ScrapeError> {
        self.registry.before_call(domain).await?;

        if backend == BackendKind::MeteredApi {
            self.quota
                .try_acquire(&task.filters.query_text())
                .await
                .map_err(|reason| ScrapeError::QuotaExhausted { reason })?;
        }

        self.rate_limiter.wait(domain, task.priority).await;

        let lease = self.pools.acquire(backend).await.map_err(|err| ScrapeError::Transient {
            domain: domain.to_string(),
            message: format!("pool exhausted: {err}"),
        })?;

        let request = ScrapeRequest {
            source_tag: task.source.clone(),
            filters: task.filters.clone(),
            url: task.url.clone(),
            deadline: self.settings.scrape_deadline,
        };

        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.settings.scrape_deadline,
            lease.instance.scrape(&request, cancel),
        )
        .await;
        self.pools.release(backend, lease).await;

        match outcome {
            Ok(Ok(outcome)) => {
                self.rate_limiter.record_success(domain, Some(started.elapsed())).await;
                self.registry.on_success(domain).await;
                Ok(outcome)
            }
            Ok(Err(err)) if err.is_cancelled() => Err(err),
            Ok(Err(err)) => {
                self.rate_limiter.record_failure(domain, err.is_blocked()).await;
                self.registry.on_failure(domain).await;
                Err(err)
            }
            Err(_elapsed) => {
                self.rate_limiter.record_failure(domain, false).await;
                self.registry.on_failure(domain).await;
                Err(ScrapeError::Transient {
                    domain: domain.to_string(),
                    message: "scrape deadline exceeded".to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl TaskHandler for OrchestratorHandler {
    async fn execute(&self, task: &Task, cancel: CancellationToken) -> Result<ScrapeOutcome, ScrapeError> {
        let domain = resolve_domain(task, &self.settings.metered_domain);
        let backend = self.choose_backend(task, &domain).await;

        let primary = match self.run_pass(task, &domain, backend, cancel.clone()).await {
            Err(ScrapeError::QuotaExhausted { reason }) if backend == BackendKind::MeteredApi => {
                // `choose_backend`'s pre-flight snapshot only sees
                // `remaining == 0`; it can't see the free-tier high-value
                // gate, so `tryAcquire` itself is the first place a
                // low-value-query refusal surfaces. Reroute once to the
                // source's non-metered fallback per spec.md §4.7 step 4 /
                // §7 rather than failing the task outright.
                let fallback = quota_fallback_backend(task);
                if fallback == backend {
                    return Err(ScrapeError::QuotaExhausted { reason });
                }
                self.run_pass(task, &domain, fallback, cancel.clone()).await?
            }
            other => other?,
        };

        if !task.hybrid {
            return Ok(primary);
        }

        // Depth pass, breadth already covered by `primary` (spec.md §4.7,
        // `hybrid.rs`). Best-effort: a failed depth pass still returns the
        // successful breadth pass rather than failing the whole task.
        let native = BackendKind::native_for(&task.source);
        match native {
            Some(native) if native != backend => {
                match self.run_pass(task, &domain, native, cancel).await {
                    Ok(depth) => Ok(hybrid::merge(primary, depth)),
                    Err(_) => Ok(primary),
                }
            }
            _ => Ok(primary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrape_circuitbreaker::CircuitBreakerConfig;
    use scrape_core::{Filters, ScrapeOutcome};
    use scrape_pool::{FnFactory, Pool, PoolConfig, PoolRegistry, ScraperContract};
    use scrape_quota::settings_store::NullStore;
    use scrape_quota::QuotaConfig;
    use scrape_ratelimiter::RateLimiterConfig;

    struct StubScraper;

    #[async_trait]
    impl ScraperContract for StubScraper {
        async fn scrape(
            &self,
            _request: &scrape_core::ScrapeRequest,
            _cancel: CancellationToken,
        ) -> Result<ScrapeOutcome, ScrapeError> {
            Ok(ScrapeOutcome::default())
        }
    }

    fn handler_with_pools() -> OrchestratorHandler {
        let mut pools = PoolRegistry::new();
        pools.insert(
            BackendKind::Rss,
            Pool::new(
                "rss",
                Arc::new(FnFactory(|| Box::new(StubScraper) as Box<dyn ScraperContract>)),
                PoolConfig::new(2),
            ),
        );

        OrchestratorHandler::new(
            HandlerSettings {
                use_metered_first: true,
                metered_domain: "serpapi.com".to_string(),
                scrape_deadline: Duration::from_secs(5),
            },
            Arc::new(Registry::new(CircuitBreakerConfig::default())),
            Arc::new(RateLimiter::new(RateLimiterConfig {
                initial_delay: Duration::from_millis(1),
                min_delay: Duration::from_millis(1),
                ..RateLimiterConfig::default()
            })),
            Arc::new(QuotaLedger::new(
                QuotaConfig {
                    monthly_quota: 5,
                    free_tier_mode: true,
                    high_value_only: true,
                    ..QuotaConfig::default()
                },
                Box::new(NullStore),
            )),
            Arc::new(pools),
        )
    }

    /// spec.md §8 scenario 1, at the single-task level: a low-value query
    /// against the metered backend under free-tier high-value-only mode
    /// reroutes to the source's native fallback instead of failing the
    /// task outright.
    #[tokio::test]
    async fn quota_refusal_reroutes_to_native_fallback_backend() {
        let handler = handler_with_pools();
        let mut task = Task::new("t1", "rss", 5);
        task.filters = Filters {
            keywords: vec!["random word".to_string()],
            ..Default::default()
        };

        let outcome = handler.execute(&task, CancellationToken::new()).await;
        assert!(outcome.is_ok(), "expected reroute to rss to succeed, got {outcome:?}");
    }
}
