//! Corrective actions keyed on (metric, direction, severity) — spec.md
//! §4.8's table, carried over from `anomaly_detector.py`'s
//! `_get_suggested_actions` but narrowed to the four concrete actions the
//! design calls for rather than the Python's free-text suggestion lists.
//!
//! These are returned as data, not executed here: C8 has no handle on C1,
//! C2, or C6, so acting on an anomaly is the orchestrator's job once it
//! observes a [`crate::events::HealthEvent::AnomalyDetected`] — message
//! passing instead of a back-reference, per spec.md §9.

use crate::metric::{Direction, MetricKind};
use crate::zscore::Severity;
use std::time::Duration;

/// The preemptive-open cooldown spec.md §4.8 names for a critical
/// `error_rate` spike.
pub const CIRCUIT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq)]
pub enum CorrectiveAction {
    RotateProxies,
    WidenRateLimitDelays,
    ScaleWorkersDown,
    AlertOperator { message: String },
    OpenAllCircuitsFor(Duration),
}

/// Computes the actions for one anomaly. Severities below `high` never
/// trigger anything for `success_rate`/`avg_response_time_ms`, and nothing
/// short of `critical` opens circuits, matching spec.md §4.8 exactly.
pub fn actions_for(metric: MetricKind, direction: Direction, severity: Severity) -> Vec<CorrectiveAction> {
    match (metric, direction) {
        (MetricKind::SuccessRate, Direction::Down) if severity.is_high_or_above() => vec![
            CorrectiveAction::RotateProxies,
            CorrectiveAction::WidenRateLimitDelays,
            CorrectiveAction::AlertOperator {
                message: "success_rate dropped significantly".to_string(),
            },
        ],
        (MetricKind::AvgResponseTimeMs, Direction::Up) if severity.is_high_or_above() => {
            vec![CorrectiveAction::ScaleWorkersDown]
        }
        (MetricKind::JobsPerTask, Direction::Down) if severity.is_high_or_above() => {
            vec![CorrectiveAction::AlertOperator {
                message: "jobs_per_task dropped significantly; likely selector/format drift"
                    .to_string(),
            }]
        }
        (MetricKind::ErrorRate, Direction::Up) if severity == Severity::Critical => {
            vec![CorrectiveAction::OpenAllCircuitsFor(CIRCUIT_COOLDOWN)]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_drop_at_high_triggers_three_actions() {
        let actions = actions_for(MetricKind::SuccessRate, Direction::Down, Severity::High);
        assert_eq!(actions.len(), 3);
        assert!(actions.contains(&CorrectiveAction::RotateProxies));
    }

    #[test]
    fn success_rate_drop_at_low_triggers_nothing() {
        assert!(actions_for(MetricKind::SuccessRate, Direction::Down, Severity::Low).is_empty());
    }

    #[test]
    fn response_time_increase_at_medium_triggers_nothing() {
        assert!(actions_for(
            MetricKind::AvgResponseTimeMs,
            Direction::Up,
            Severity::Medium
        )
        .is_empty());
    }

    #[test]
    fn error_rate_increase_only_opens_circuits_at_critical() {
        assert!(actions_for(MetricKind::ErrorRate, Direction::Up, Severity::High).is_empty());
        let actions = actions_for(MetricKind::ErrorRate, Direction::Up, Severity::Critical);
        assert_eq!(
            actions,
            vec![CorrectiveAction::OpenAllCircuitsFor(CIRCUIT_COOLDOWN)]
        );
    }

    #[test]
    fn jobs_per_task_drop_only_alerts_never_auto_mutates() {
        let actions = actions_for(MetricKind::JobsPerTask, Direction::Down, Severity::Critical);
        assert!(matches!(actions.as_slice(), [CorrectiveAction::AlertOperator { .. }]));
    }
}
