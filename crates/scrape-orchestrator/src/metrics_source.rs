//! Feeds [`scrape_health::HealthMonitor`] a [`MetricSample`] every tick.
//!
//! `scrape-health` never reaches into C1/C2/C6 itself (its own doc comment
//! says so); this is the one place that pull and the worker event stream
//! meet, matching spec.md §4.8's "maintains four rolling metrics with
//! bounded history (30-100 samples each)" — [`RollingMetrics`] is the
//! bounded history, and [`RollingMetrics::current_sample`] is the pull.

use async_trait::async_trait;
use scrape_health::MetricSample;
use scrape_health::MetricsSource;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

const HISTORY: usize = 100;

#[derive(Default)]
struct Counters {
    successes: VecDeque<bool>,
    response_times: VecDeque<Duration>,
    jobs_per_task: VecDeque<f64>,
}

/// Bounded rolling counters the orchestrator updates from
/// [`crate::handler::OrchestratorHandler::execute`]'s own outcomes and
/// reads from on each health tick.
pub struct RollingMetrics {
    counters: Mutex<Counters>,
}

impl RollingMetrics {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
        }
    }

    pub fn record_task(&self, success: bool, duration: Duration, record_count: usize) {
        let mut counters = self.counters.lock().expect("rolling metrics mutex poisoned");
        push_bounded(&mut counters.successes, success);
        push_bounded(&mut counters.response_times, duration);
        push_bounded(&mut counters.jobs_per_task, record_count as f64);
    }

    pub fn current_sample(&self) -> MetricSample {
        let counters = self.counters.lock().expect("rolling metrics mutex poisoned");
        let total = counters.successes.len();
        let success_count = counters.successes.iter().filter(|s| **s).count();

        let success_rate = if total == 0 {
            1.0
        } else {
            success_count as f64 / total as f64
        };
        let error_rate = 1.0 - success_rate;

        let avg_response_time_ms = if counters.response_times.is_empty() {
            0.0
        } else {
            let sum: Duration = counters.response_times.iter().sum();
            sum.as_secs_f64() * 1000.0 / counters.response_times.len() as f64
        };

        let jobs_per_task = if counters.jobs_per_task.is_empty() {
            0.0
        } else {
            counters.jobs_per_task.iter().sum::<f64>() / counters.jobs_per_task.len() as f64
        };

        MetricSample {
            success_rate,
            avg_response_time_ms,
            jobs_per_task,
            error_rate,
        }
    }
}

impl Default for RollingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded<T>(deque: &mut VecDeque<T>, value: T) {
    if deque.len() >= HISTORY {
        deque.pop_front();
    }
    deque.push_back(value);
}

#[async_trait]
impl MetricsSource for RollingMetrics {
    async fn current_metrics(&self) -> MetricSample {
        self.current_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_tasks_yet_reports_perfect_success_rate() {
        let metrics = RollingMetrics::new();
        let sample = metrics.current_sample();
        assert_eq!(sample.success_rate, 1.0);
        assert_eq!(sample.error_rate, 0.0);
    }

    #[test]
    fn mixed_outcomes_compute_the_expected_rates() {
        let metrics = RollingMetrics::new();
        metrics.record_task(true, Duration::from_millis(100), 5);
        metrics.record_task(true, Duration::from_millis(300), 3);
        metrics.record_task(false, Duration::from_millis(200), 0);

        let sample = metrics.current_sample();
        assert!((sample.success_rate - (2.0 / 3.0)).abs() < 1e-9);
        assert!((sample.avg_response_time_ms - 200.0).abs() < 1e-9);
        assert!((sample.jobs_per_task - (8.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn history_is_bounded() {
        let metrics = RollingMetrics::new();
        for _ in 0..(HISTORY * 2) {
            metrics.record_task(true, Duration::from_millis(1), 1);
        }
        let counters = metrics.counters.lock().unwrap();
        assert_eq!(counters.successes.len(), HISTORY);
    }
}
