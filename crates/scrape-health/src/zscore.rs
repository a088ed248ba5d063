//! Z-score anomaly detection over a bounded history (spec.md §4.8),
//! carried over from `original_source/.../anomaly_detector.py`'s
//! `_check_metric_anomaly`: thresholds and the minimum-sample gate are
//! kept verbatim, the baseline excludes the value under test the same
//! way the Python's `history[:-1]` slice does.

use std::collections::VecDeque;

/// |z| ≥ these cutoffs, in ascending order (spec.md §4.8).
const LOW: f64 = 1.5;
const MEDIUM: f64 = 2.0;
const HIGH: f64 = 2.5;
const CRITICAL: f64 = 3.0;

/// Samples needed before a z-score is meaningful at all.
pub const MIN_SAMPLES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_z(z: f64) -> Option<Self> {
        let z = z.abs();
        if z >= CRITICAL {
            Some(Severity::Critical)
        } else if z >= HIGH {
            Some(Severity::High)
        } else if z >= MEDIUM {
            Some(Severity::Medium)
        } else if z >= LOW {
            Some(Severity::Low)
        } else {
            None
        }
    }

    pub fn is_high_or_above(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

/// A fixed-capacity rolling window, evicting the oldest sample once full.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

/// Verdict from [`RollingWindow::push_and_check`]: the new value's z-score
/// against the window's prior mean/stdev, if enough history exists to
/// compute one.
#[derive(Debug, Clone, Copy)]
pub struct ZCheck {
    pub value: f64,
    pub baseline_mean: f64,
    pub z_score: f64,
    pub severity: Severity,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Pushes `value` and, if the window (excluding this value) already has
    /// `MIN_SAMPLES` observations and non-zero variance, returns its
    /// z-score against that prior history.
    pub fn push_and_check(&mut self, value: f64) -> Option<ZCheck> {
        let prior: Vec<f64> = self.samples.iter().copied().collect();

        self.samples.push_back(value);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }

        if prior.len() < MIN_SAMPLES {
            return None;
        }

        let mean = mean(&prior);
        let stdev = stdev(&prior, mean);
        if stdev == 0.0 {
            return None;
        }

        let z_score = (value - mean) / stdev;
        let severity = Severity::from_z(z_score)?;
        Some(ZCheck {
            value,
            baseline_mean: mean,
            z_score,
            severity,
        })
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(mean(&self.samples.iter().copied().collect::<Vec<_>>()))
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn stdev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
