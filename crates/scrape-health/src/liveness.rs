//! Worker liveness and per-domain success trend tracking (spec.md §4.8:
//! "Also tracks per-worker liveness and per-domain success trend").

use crate::zscore::RollingWindow;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const DOMAIN_TREND_WINDOW: usize = 20;

/// Tracks the last time each worker reported in, so a dead one can be
/// told apart from one that's merely between tasks.
#[derive(Debug, Default)]
pub struct LivenessTracker {
    last_seen: HashMap<String, Instant>,
}

impl LivenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, worker_id: &str) {
        self.last_seen.insert(worker_id.to_string(), Instant::now());
    }

    pub fn forget(&mut self, worker_id: &str) {
        self.last_seen.remove(worker_id);
    }

    /// Workers whose last touch is older than `threshold`.
    pub fn stale_workers(&self, threshold: Duration) -> Vec<String> {
        let now = Instant::now();
        self.last_seen
            .iter()
            .filter(|(_, seen)| now.duration_since(**seen) > threshold)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Rolling success rate per domain, independent of the global
/// `success_rate` metric C8 z-scores — this one is read directly (mean of
/// the window), not anomaly-checked, to answer "is example.com trending
/// down" without needing a global baseline.
#[derive(Debug, Default)]
pub struct DomainTrends {
    windows: HashMap<String, RollingWindow>,
}

impl DomainTrends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, domain: &str, success: bool) {
        let window = self
            .windows
            .entry(domain.to_string())
            .or_insert_with(|| RollingWindow::new(DOMAIN_TREND_WINDOW));
        window.push_and_check(if success { 1.0 } else { 0.0 });
    }

    /// Mean success rate over the domain's trend window, if any samples
    /// have been recorded yet.
    pub fn success_rate(&self, domain: &str) -> Option<f64> {
        self.windows.get(domain).and_then(|w| w.mean())
    }
}
