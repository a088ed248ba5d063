//! [`HealthMonitor`]: the 60s tick that samples rolling metrics, z-scores
//! them, and emits corrective-action events (spec.md §4.8). It never calls
//! into C1/C2/C6 directly — it pulls a snapshot through [`MetricsSource`]
//! and pushes findings out through [`HealthEvent`], so the orchestrator
//! (the only thing that implements `MetricsSource` and the only thing
//! that listens for `HealthEvent`) is the one place the two meet.

use crate::actions::{actions_for, CorrectiveAction};
use crate::config::HealthConfig;
use crate::detector::AnomalyDetector;
use crate::events::{EventSink, HealthEvent};
use crate::liveness::{DomainTrends, LivenessTracker};
use crate::metric::MetricSample;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// What `HealthMonitor` pulls a fresh snapshot from every tick. The
/// orchestrator implements this over its own C1/C2/C6 state; `scrape-health`
/// has no knowledge of what's behind it.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn current_metrics(&self) -> MetricSample;
}

pub struct HealthMonitor {
    config: HealthConfig,
    detector: Mutex<AnomalyDetector>,
    liveness: Mutex<LivenessTracker>,
    trends: Mutex<DomainTrends>,
    events: EventSink,
}

impl HealthMonitor {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            detector: Mutex::new(AnomalyDetector::new()),
            liveness: Mutex::new(LivenessTracker::new()),
            trends: Mutex::new(DomainTrends::new()),
            events: EventSink::default(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: scrape_core::events::EventListener<HealthEvent> + 'static,
    {
        self.events.add_listener(listener);
    }

    pub async fn touch_worker(&self, worker_id: &str) {
        self.liveness.lock().await.touch(worker_id);
    }

    pub async fn record_domain_outcome(&self, domain: &str, success: bool) {
        self.trends.lock().await.record(domain, success);
    }

    pub async fn domain_success_rate(&self, domain: &str) -> Option<f64> {
        self.trends.lock().await.success_rate(domain)
    }

    pub async fn stale_workers(&self) -> Vec<String> {
        self.liveness
            .lock()
            .await
            .stale_workers(self.config.worker_stale_threshold)
    }

    /// Runs one detection cycle against `sample`, emitting an
    /// `AnomalyDetected` event per triggered metric and returning the
    /// union of corrective actions so the caller can act on them (and, if
    /// empty, knows nothing needs doing).
    pub async fn tick(&self, sample: MetricSample) -> Vec<CorrectiveAction> {
        let anomalies = self.detector.lock().await.observe(sample);
        let mut all_actions = Vec::new();

        for anomaly in anomalies {
            let actions = actions_for(anomaly.metric, anomaly.direction, anomaly.check.severity);
            self.events.emit(HealthEvent::AnomalyDetected {
                metric: anomaly.metric,
                direction: anomaly.direction,
                severity: anomaly.check.severity,
                z_score: anomaly.check.z_score,
                value: anomaly.check.value,
                baseline: anomaly.check.baseline_mean,
                actions: actions.clone(),
            });
            all_actions.extend(actions);
        }

        for worker_id in self.stale_workers().await {
            self.events.emit(HealthEvent::WorkerUnresponsive { worker_id });
        }

        all_actions
    }

    /// Runs `tick` every `config.tick_interval` until `shutdown` fires,
    /// pulling a fresh snapshot from `source` each time (spec.md §4.8's
    /// own monitoring loop, distinct from C6's worker loop).
    pub async fn run(&self, source: &(dyn MetricsSource + '_), shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.tick().await; // first tick fires immediately; skip it

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let sample = source.current_metrics().await;
                    self.tick(sample).await;
                }
            }
        }
    }
}
