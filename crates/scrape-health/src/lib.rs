//! Rolling-metric anomaly detection and worker/domain health tracking (C8)
//! for the scrape control plane.
//!
//! Four global metrics (`success_rate`, `avg_response_time_ms`,
//! `jobs_per_task`, `error_rate`) are z-scored against their own rolling
//! history every tick; a severity past `high` maps to a corrective action
//! (proxy rotation, widened rate limits, scaling workers down, or a
//! preemptive circuit-breaker cooldown) per spec.md §4.8's table. This
//! crate never calls C1/C2/C6 to apply those actions itself — it reports
//! them as data through [`events::HealthEvent`] and expects the
//! orchestrator, which owns all of those, to act.
//!
//! ```
//! # use scrape_health::{HealthConfig, HealthMonitor, MetricSample};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let monitor = HealthMonitor::new(HealthConfig::default());
//! let actions = monitor.tick(MetricSample {
//!     success_rate: 0.95,
//!     avg_response_time_ms: 450.0,
//!     jobs_per_task: 9.0,
//!     error_rate: 0.01,
//! }).await;
//! assert!(actions.is_empty());
//! # }
//! ```

mod actions;
mod config;
mod detector;
mod events;
mod liveness;
mod metric;
mod monitor;
mod zscore;

pub use actions::{CorrectiveAction, CIRCUIT_COOLDOWN};
pub use config::HealthConfig;
pub use detector::{AnomalyDetector, MetricAnomaly};
pub use events::HealthEvent;
pub use liveness::{DomainTrends, LivenessTracker};
pub use metric::{Direction, MetricKind, MetricSample};
pub use monitor::{HealthMonitor, MetricsSource};
pub use zscore::{Severity, MIN_SAMPLES};
