//! Per-registry circuit breaker configuration.

use std::time::Duration;

/// Thresholds governing every [`crate::circuit::Circuit`] a [`crate::Registry`]
/// manages (spec.md §4.1). One config is shared by every domain in a
/// registry — the orchestrator owns exactly one `Registry`.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Failures within the (unbounded) open window before CLOSED → OPEN.
    /// Default: 5.
    pub failure_threshold: u32,
    /// How long a circuit stays OPEN before its first probe call is let
    /// through (OPEN → HALF_OPEN). Default: 60s.
    pub recovery_timeout: Duration,
    /// Consecutive successes in HALF_OPEN required to close the circuit.
    /// Default: 2.
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 2,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn builder() -> CircuitBreakerConfigBuilder {
        CircuitBreakerConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CircuitBreakerConfigBuilder {
    config: CircuitBreakerConfig,
}

impl CircuitBreakerConfigBuilder {
    pub fn failure_threshold(mut self, n: u32) -> Self {
        self.config.failure_threshold = n;
        self
    }

    pub fn recovery_timeout(mut self, d: Duration) -> Self {
        self.config.recovery_timeout = d;
        self
    }

    pub fn success_threshold(mut self, n: u32) -> Self {
        self.config.success_threshold = n;
        self
    }

    pub fn build(self) -> CircuitBreakerConfig {
        self.config
    }
}
