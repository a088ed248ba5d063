//! The error taxonomy shared by every component in the control plane.
//!
//! Unlike a generic middleware wrapper error, the kinds here are closed and
//! specific to the scraping domain: there is no `Application(E)` escape
//! hatch, because every place an error can originate is enumerated in the
//! design (transient network failure, anti-bot block, circuit rejection,
//! quota rejection, parse drift, cancellation, or a fatal host failure).
//! Workers match on these kinds exhaustively rather than downcasting.

use std::fmt;
use std::time::Duration;

/// A single error emitted by any component in the scrape control plane.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScrapeError {
    /// TCP reset, DNS hiccup, 5xx — retried locally by the backend up to
    /// 3 times before surfacing.
    #[error("transient network error for {domain}: {message}")]
    Transient { domain: String, message: String },

    /// 403, 429, CAPTCHA challenge. Penalized heavily by the rate limiter
    /// and counted against the circuit breaker.
    #[error("blocked by {domain}: {message}")]
    Blocked { domain: String, message: String },

    /// Admission refused by the circuit breaker registry.
    #[error("circuit open for {domain}")]
    CircuitOpen { domain: String },

    /// Admission refused by the quota guard.
    #[error("quota exhausted: {reason}")]
    QuotaExhausted { reason: QuotaExhaustedReason },

    /// The backend returned fewer records than history suggests it should
    /// have — surfaced for the anomaly monitor, not retried.
    #[error("parse drift for {domain}: expected at least one record, got {got}")]
    ParseDrift { domain: String, got: usize },

    /// Terminal, not retried. A cancelled task becomes `Cancelled`, not
    /// `Failed`.
    #[error("task {task_id} cancelled")]
    Cancelled { task_id: String },

    /// Pool unrecoverable, configuration invalid, persistent store
    /// unreachable. Surfaces to the operator; the orchestrator enters a
    /// drain state.
    #[error("fatal error: {message}")]
    Fatal { message: String },
}

/// Why the quota guard refused an admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaExhaustedReason {
    MonthlyExhausted,
    DailyLimitReached,
    HourlyLimitReached,
    LowValueQueryInFreeTier,
}

impl fmt::Display for QuotaExhaustedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuotaExhaustedReason::MonthlyExhausted => "monthly quota exhausted",
            QuotaExhaustedReason::DailyLimitReached => "daily limit reached",
            QuotaExhaustedReason::HourlyLimitReached => "hourly limit reached",
            QuotaExhaustedReason::LowValueQueryInFreeTier => {
                "low-value query rejected under free-tier high-value-only mode"
            }
        };
        f.write_str(s)
    }
}

impl ScrapeError {
    /// Errors the worker loop should retry locally (backend's own retry
    /// budget), as opposed to ones that change scheduling behavior.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScrapeError::Transient { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ScrapeError::Blocked { .. })
    }

    pub fn is_circuit_open(&self) -> bool {
        matches!(self, ScrapeError::CircuitOpen { .. })
    }

    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, ScrapeError::QuotaExhausted { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScrapeError::Cancelled { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ScrapeError::Fatal { .. })
    }

    /// Whether the worker loop should retry the task (bump retry_count and
    /// re-push), as opposed to a terminal outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Transient { .. } | ScrapeError::Blocked { .. }
        )
    }

    /// Suggested scheduling delay when requeuing after this error, per the
    /// circuit-open requeue penalty in the design (`+30s scheduled delay`).
    pub fn requeue_delay(&self) -> Option<Duration> {
        match self {
            ScrapeError::CircuitOpen { .. } => Some(Duration::from_secs(30)),
            _ => None,
        }
    }
}
