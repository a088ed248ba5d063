//! [`AnomalyDetector`]: owns the four rolling windows spec.md §4.8 names
//! and reports a z-score check per metric per tick.

use crate::metric::{Direction, MetricKind, MetricSample};
use crate::zscore::{RollingWindow, ZCheck};
use std::collections::HashMap;

/// One metric's z-score verdict for this tick, with its direction
/// resolved against the baseline `ZCheck` already carries.
#[derive(Debug, Clone, Copy)]
pub struct MetricAnomaly {
    pub metric: MetricKind,
    pub direction: Direction,
    pub check: ZCheck,
}

pub struct AnomalyDetector {
    windows: HashMap<MetricKind, RollingWindow>,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector {
    pub fn new() -> Self {
        let windows = MetricKind::ALL
            .into_iter()
            .map(|kind| (kind, RollingWindow::new(kind.window_size())))
            .collect();
        Self { windows }
    }

    /// Feeds one sample into every metric's window, returning the
    /// anomalies (if any) the new values triggered.
    pub fn observe(&mut self, sample: MetricSample) -> Vec<MetricAnomaly> {
        let mut anomalies = Vec::new();
        for kind in MetricKind::ALL {
            let value = sample.value_for(kind);
            let window = self.windows.get_mut(&kind).expect("all kinds seeded in new()");
            if let Some(check) = window.push_and_check(value) {
                anomalies.push(MetricAnomaly {
                    metric: kind,
                    direction: Direction::of(check.value, check.baseline_mean),
                    check,
                });
            }
        }
        anomalies
    }

    pub fn window(&self, kind: MetricKind) -> &RollingWindow {
        self.windows.get(&kind).expect("all kinds seeded in new()")
    }
}
