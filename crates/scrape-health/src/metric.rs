//! The four rolling metrics C8 watches (spec.md §4.8), with the window
//! sizes carried over from `anomaly_detector.py`'s `detection_windows`.

/// One of the four tracked global metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    SuccessRate,
    AvgResponseTimeMs,
    JobsPerTask,
    ErrorRate,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::SuccessRate,
        MetricKind::AvgResponseTimeMs,
        MetricKind::JobsPerTask,
        MetricKind::ErrorRate,
    ];

    /// Window size, in samples, kept for this metric.
    pub fn window_size(&self) -> usize {
        match self {
            MetricKind::SuccessRate => 50,
            MetricKind::AvgResponseTimeMs => 100,
            MetricKind::JobsPerTask => 30,
            MetricKind::ErrorRate => 50,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::SuccessRate => "success_rate",
            MetricKind::AvgResponseTimeMs => "avg_response_time_ms",
            MetricKind::JobsPerTask => "jobs_per_task",
            MetricKind::ErrorRate => "error_rate",
        }
    }
}

/// Which way a metric moved relative to its own baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn of(value: f64, baseline: f64) -> Self {
        if value > baseline {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// One tick's worth of measurements, supplied by whatever owns the task
/// lifecycle (the orchestrator) through [`crate::monitor::MetricsSource`].
/// A plain struct, not a `HashMap<String, f64>` — spec.md §9's
/// dynamic-typed-config flag applies here too: the four metrics this
/// component understands are closed and named.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricSample {
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
    pub jobs_per_task: f64,
    pub error_rate: f64,
}

impl MetricSample {
    pub fn value_for(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::SuccessRate => self.success_rate,
            MetricKind::AvgResponseTimeMs => self.avg_response_time_ms,
            MetricKind::JobsPerTask => self.jobs_per_task,
            MetricKind::ErrorRate => self.error_rate,
        }
    }
}
