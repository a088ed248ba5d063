//! Lifecycle events emitted by [`crate::monitor::HealthMonitor`], built on
//! `scrape_core::events` the way every observable component in the
//! workspace is.

use crate::actions::CorrectiveAction;
use crate::metric::{Direction, MetricKind};
use crate::zscore::Severity;
use scrape_core::events::{EventListeners, ScrapeEvent};
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum HealthEvent {
    /// `anomaly_detected` in spec.md §4.9's events topic.
    AnomalyDetected {
        metric: MetricKind,
        direction: Direction,
        severity: Severity,
        z_score: f64,
        value: f64,
        baseline: f64,
        actions: Vec<CorrectiveAction>,
    },
    WorkerUnresponsive {
        worker_id: String,
    },
}

impl ScrapeEvent for HealthEvent {
    fn event_type(&self) -> &'static str {
        match self {
            HealthEvent::AnomalyDetected { .. } => "anomaly_detected",
            HealthEvent::WorkerUnresponsive { .. } => "worker_unresponsive",
        }
    }

    fn timestamp(&self) -> Instant {
        Instant::now()
    }

    fn pattern_name(&self) -> &str {
        match self {
            HealthEvent::AnomalyDetected { metric, .. } => metric.label(),
            HealthEvent::WorkerUnresponsive { worker_id } => worker_id,
        }
    }
}

#[derive(Default)]
pub struct EventSink(pub EventListeners<HealthEvent>);

impl EventSink {
    pub fn emit(&self, event: HealthEvent) {
        self.0.emit(&event);
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: scrape_core::events::EventListener<HealthEvent> + 'static,
    {
        self.0.add(listener);
    }
}
