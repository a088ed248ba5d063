//! [`Orchestrator`] — C7, the composition root that owns C1-C6, C8, and
//! C9 and wires them together (spec.md §3, §4.7).
//!
//! Nothing here is a process-wide singleton (`original_source/...`'s
//! module-level managers are exactly the anti-pattern spec.md §9 flags):
//! every registry is an owned value behind an `Arc`, constructed once in
//! [`Orchestrator::new`] and handed out to the handful of background
//! tasks [`Orchestrator::start`] spawns. Those tasks never call back into
//! `Orchestrator` itself — they only hold the `Arc`s they need, the same
//! message-passing shape C6's worker/handler split uses (spec.md §9).

use crate::config::OrchestratorConfig;
use crate::dedup::DedupCache;
use crate::domain::resolve_domain;
use crate::handler::{HandlerSettings, OrchestratorHandler};
use crate::metrics_source::RollingMetrics;
use crate::publisher::Publisher;
use scrape_circuitbreaker::{CircuitBreakerConfig, Registry};
use scrape_core::events::EventListener;
use scrape_core::{BackendKind, Task};
use scrape_events::EventSink;
use scrape_health::{CorrectiveAction, HealthConfig, HealthEvent, HealthMonitor};
use scrape_pool::{Pool, PoolConfig, PoolRegistry, ScraperFactory};
use scrape_quota::settings_store::JsonFileStore;
use scrape_quota::{QuotaConfig, QuotaLedger};
use scrape_queue::TaskQueue;
use scrape_ratelimiter::{RateLimiter, RateLimiterConfig};
use scrape_workers::{WorkerEvent, WorkerSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const MIN_WORKERS: usize = 5;
const MAX_WORKERS: usize = 50;
const SCALE_STEP: usize = 5;

/// Forwards [`HealthEvent::AnomalyDetected`]'s actions to
/// [`Orchestrator::spawn_action_loop`] rather than `scrape-health` calling
/// back into C1/C2/C6 itself (spec.md §9) — the same one-way
/// message-passing shape C6's `WorkerEvent` channel uses.
struct ActionForwarder {
    tx: mpsc::UnboundedSender<Vec<CorrectiveAction>>,
}

impl EventListener<HealthEvent> for ActionForwarder {
    fn on_event(&self, event: &HealthEvent) {
        if let HealthEvent::AnomalyDetected { actions, .. } = event {
            let _ = self.tx.send(actions.clone());
        }
    }
}

pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: Arc<Registry>,
    rate_limiter: Arc<RateLimiter>,
    quota: Arc<QuotaLedger>,
    pools: Arc<PoolRegistry>,
    queue: Arc<TaskQueue>,
    workers: WorkerSet,
    health: Arc<HealthMonitor>,
    metrics_source: Arc<RollingMetrics>,
    publisher: Arc<Publisher>,
    health_actions_rx: StdMutex<Option<mpsc::UnboundedReceiver<Vec<CorrectiveAction>>>>,
    shutdown: CancellationToken,
}

impl Orchestrator {
    /// Builds every owned registry from `config` and wires C6's worker
    /// set to a fresh [`OrchestratorHandler`]. `factories` supplies one
    /// [`ScraperFactory`] per backend kind the deployment cares about —
    /// the scrapers themselves are out of scope here (spec.md §1); `sink`
    /// is the already-retry-wrapped transport C9 publishes through.
    pub fn new(
        config: OrchestratorConfig,
        factories: HashMap<BackendKind, Arc<dyn ScraperFactory>>,
        sink: Box<dyn EventSink>,
    ) -> Self {
        let registry = Arc::new(Registry::new(CircuitBreakerConfig {
            failure_threshold: config.circuit_failure_threshold,
            recovery_timeout: config.circuit_recovery_timeout(),
            ..CircuitBreakerConfig::default()
        }));

        let rate_limiter = Arc::new(RateLimiter::new(RateLimiterConfig {
            adaptive: config.adaptive_rate_limiting,
            window_limit: config.rate_limit_per_domain,
            window: config.rate_limit_window(),
            ..RateLimiterConfig::default()
        }));

        let quota_store = JsonFileStore::new(config.settings_store_path.clone());
        let quota = Arc::new(QuotaLedger::new(
            QuotaConfig {
                monthly_quota: config.metered_monthly_quota,
                free_tier_mode: config.metered_free_tier_mode,
                high_value_only: config.metered_high_value_only,
                ..QuotaConfig::default()
            },
            Box::new(quota_store),
        ));

        let mut pool_registry = PoolRegistry::new();
        for (kind, factory) in factories {
            let pool_config = PoolConfig::new(config.pool_size_for(kind));
            pool_registry.insert(kind, Pool::new(format!("{kind:?}"), factory, pool_config));
        }
        let pools = Arc::new(pool_registry);

        let queue = Arc::new(TaskQueue::new());

        let handler_settings = HandlerSettings {
            use_metered_first: config.use_metered_first,
            metered_domain: config.metered_domain.clone(),
            scrape_deadline: config.scrape_deadline(),
        };
        let handler = Arc::new(OrchestratorHandler::new(
            handler_settings,
            Arc::clone(&registry),
            Arc::clone(&rate_limiter),
            Arc::clone(&quota),
            Arc::clone(&pools),
        ));
        let (workers, events_rx) = WorkerSet::new(Arc::clone(&queue), handler);

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut health = HealthMonitor::new(HealthConfig::default());
        health.add_listener(ActionForwarder { tx: action_tx });
        let health = Arc::new(health);

        let metrics_source = Arc::new(RollingMetrics::new());
        let publisher = Arc::new(Publisher::new(sink));

        let orchestrator = Self {
            config,
            registry,
            rate_limiter,
            quota,
            pools,
            queue,
            workers,
            health,
            metrics_source,
            publisher,
            health_actions_rx: StdMutex::new(Some(action_rx)),
            shutdown: CancellationToken::new(),
        };

        orchestrator.spawn_event_drain(events_rx);
        orchestrator
    }

    /// Warms every pool, starts the initial worker wave, and spawns the
    /// health-tick, corrective-action, and scaling/reap supervisor loops
    /// (spec.md §4.7's startup sequence).
    pub async fn start(self: &Arc<Self>) {
        self.pools.warm_up_all().await;

        // Honor a configured ceiling below `MIN_WORKERS` (spec.md §8: "With
        // `max_concurrent_scrapers = 1`, tasks run strictly serially") —
        // only `MAX_WORKERS` is a hard cap, never raised past what the
        // operator asked for.
        let initial_workers = self.config.max_concurrent_scrapers.clamp(1, MAX_WORKERS);
        self.workers.start(initial_workers).await;

        let action_rx = self
            .health_actions_rx
            .lock()
            .expect("health actions mutex poisoned")
            .take()
            .expect("start called more than once");

        self.spawn_health_loop();
        self.spawn_action_loop(action_rx);
        self.spawn_scaling_loop();
    }

    fn spawn_health_loop(self: &Arc<Self>) {
        let health = Arc::clone(&self.health);
        let metrics_source = Arc::clone(&self.metrics_source);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            health.run(metrics_source.as_ref(), shutdown).await;
        });
    }

    fn spawn_action_loop(self: &Arc<Self>, mut action_rx: mpsc::UnboundedReceiver<Vec<CorrectiveAction>>) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(actions) = action_rx.recv().await {
                for action in actions {
                    this.apply_corrective_action(action).await;
                }
            }
        });
    }

    /// Applies a [`CorrectiveAction`] C8 decided on (spec.md §4.8): this
    /// is the only place anything acts on C1/C2/C6 in response to an
    /// anomaly, since `scrape-health` only ever reports them as data.
    async fn apply_corrective_action(&self, action: CorrectiveAction) {
        match action {
            CorrectiveAction::OpenAllCircuitsFor(cooldown) => {
                self.registry.force_open_all().await;
                let registry = Arc::clone(&self.registry);
                tokio::spawn(async move {
                    tokio::time::sleep(cooldown).await;
                    for domain in registry.open_domains().await {
                        registry.reset(&domain).await;
                    }
                });
            }
            CorrectiveAction::WidenRateLimitDelays => {
                self.rate_limiter.widen_all(2.0).await;
            }
            CorrectiveAction::ScaleWorkersDown => {
                let floor = MIN_WORKERS.min(self.config.max_concurrent_scrapers.clamp(1, MAX_WORKERS));
                let target = self.workers.worker_count().await.saturating_sub(SCALE_STEP).max(floor);
                self.workers.scale_to(target).await;
            }
            CorrectiveAction::RotateProxies => {
                #[cfg(feature = "tracing")]
                tracing::warn!("proxy rotation requested by health monitor; no proxy pool is wired in this deployment");
            }
            CorrectiveAction::AlertOperator { message } => {
                let _ = self.publisher.anomaly_detected("health_monitor", "high", &message).await;
            }
        }
    }

    /// The periodic scaling loop (spec.md §4.7): every health tick
    /// interval, reap any dead worker, then grow toward the queue backlog
    /// or shrink toward the floor.
    fn spawn_scaling_loop(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let shutdown = self.shutdown.clone();
        let tick_interval = HealthConfig::default().tick_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = interval.tick() => {
                        this.workers.reap_and_respawn().await;
                        this.run_scaling_step().await;
                    }
                }
            }
        });
    }

    async fn run_scaling_step(&self) {
        let backlog = self.queue.size().await;
        let current = self.workers.worker_count().await;
        // Same ceiling as `start()`: never raise a configured max below
        // `MIN_WORKERS` back up, only ever cap it at `MAX_WORKERS`. The
        // scale-down floor follows the same ceiling so it can't overshoot
        // a configured max smaller than `MIN_WORKERS` either.
        let max = self.config.max_concurrent_scrapers.clamp(1, MAX_WORKERS);
        let floor = MIN_WORKERS.min(max);

        if backlog > current * 10 && current < max {
            let target = (current + SCALE_STEP).min(max);
            self.workers.scale_to(target).await;
        } else if backlog == 0 && current > floor {
            let target = current.saturating_sub(SCALE_STEP).max(floor);
            self.workers.scale_to(target).await;
        }
    }

    /// Drains C6's event channel: dedup, fan out to C9, and feed C8's
    /// rolling metrics and per-domain trend tracker. Spawned once from
    /// [`Orchestrator::new`] since it owns the receiving half of a
    /// channel that is only ever created once.
    fn spawn_event_drain(&self, mut events_rx: mpsc::UnboundedReceiver<WorkerEvent>) {
        let metrics_source = Arc::clone(&self.metrics_source);
        let health = Arc::clone(&self.health);
        let publisher = Arc::clone(&self.publisher);
        let metered_domain = self.config.metered_domain.clone();
        let mut dedup = DedupCache::new();

        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                match event {
                    WorkerEvent::Completed { task, outcome, duration } => {
                        let domain = resolve_domain(&task, &metered_domain);
                        metrics_source.record_task(true, duration, outcome.records.len());
                        health.record_domain_outcome(&domain, true).await;

                        let fresh: Vec<_> = outcome
                            .records
                            .into_iter()
                            .filter(|record| dedup.insert_if_new(&record.id))
                            .collect();
                        let _ = publisher.publish_records(&fresh, &task.source).await;
                        let _ = publisher.scraping_completed(&task.id, &task.source, fresh.len()).await;
                    }
                    WorkerEvent::Failed { task, duration, .. } => {
                        let domain = resolve_domain(&task, &metered_domain);
                        metrics_source.record_task(false, duration, 0);
                        health.record_domain_outcome(&domain, false).await;
                    }
                    WorkerEvent::WorkerStarted { worker_id } => {
                        health.touch_worker(&worker_id).await;
                    }
                    WorkerEvent::Retried { .. }
                    | WorkerEvent::DeferredByCircuit { .. }
                    | WorkerEvent::Cancelled { .. }
                    | WorkerEvent::WorkerDied { .. }
                    | WorkerEvent::WorkerStopped { .. } => {}
                }
            }
        });
    }

    /// Submits a task for scheduling (spec.md §4.5's `push`).
    pub async fn submit(&self, task: Task) {
        self.queue.push(task).await;
    }

    /// `stop(task_id)` (spec.md §4.7, §5): removes a pending task outright
    /// or cancels an in-flight one.
    pub async fn cancel(&self, task_id: &str) -> bool {
        self.workers.cancel_task(task_id).await
    }

    /// Operator command: force a single domain's circuit back to CLOSED.
    pub async fn reset_circuit(&self, domain: &str) {
        self.registry.reset(domain).await;
    }

    pub async fn open_domains(&self) -> Vec<String> {
        self.registry.open_domains().await
    }

    pub async fn queue_depth(&self) -> usize {
        self.queue.size().await
    }

    /// Operator/test introspection: the metered API's remaining monthly
    /// budget (spec.md §8's quantified invariant: `remaining >= 0`, never
    /// decremented by a refused admission).
    pub async fn quota_remaining(&self) -> u32 {
        self.quota.snapshot().await.remaining
    }

    pub async fn worker_count(&self) -> usize {
        self.workers.worker_count().await
    }

    /// Hierarchical shutdown: stops the supervisor loops, drains every
    /// worker (cancelling in-flight scrapes), and persists the quota
    /// ledger one last time (spec.md §4.3, §5).
    pub async fn drain(&self) {
        self.shutdown.cancel();
        self.workers.shutdown().await;
        let _ = self.quota.persist().await;
    }
}
