//! Lifecycle events emitted by [`crate::Registry`], built on
//! `scrape_core::events` the way every observable component in the
//! workspace is (see `scrape-core/src/events.rs`).

use crate::circuit::CircuitState;
use scrape_core::events::{EventListeners, ScrapeEvent};
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum CircuitBreakerEvent {
    StateTransition {
        domain: String,
        from: CircuitState,
        to: CircuitState,
    },
    CallPermitted {
        domain: String,
        state: CircuitState,
    },
    CallRejected {
        domain: String,
    },
    SuccessRecorded {
        domain: String,
        state: CircuitState,
    },
    FailureRecorded {
        domain: String,
        state: CircuitState,
    },
}

impl ScrapeEvent for CircuitBreakerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CircuitBreakerEvent::StateTransition { .. } => "state_transition",
            CircuitBreakerEvent::CallPermitted { .. } => "call_permitted",
            CircuitBreakerEvent::CallRejected { .. } => "call_rejected",
            CircuitBreakerEvent::SuccessRecorded { .. } => "success_recorded",
            CircuitBreakerEvent::FailureRecorded { .. } => "failure_recorded",
        }
    }

    fn timestamp(&self) -> Instant {
        Instant::now()
    }

    fn pattern_name(&self) -> &str {
        match self {
            CircuitBreakerEvent::StateTransition { domain, .. }
            | CircuitBreakerEvent::CallPermitted { domain, .. }
            | CircuitBreakerEvent::CallRejected { domain }
            | CircuitBreakerEvent::SuccessRecorded { domain, .. }
            | CircuitBreakerEvent::FailureRecorded { domain, .. } => domain,
        }
    }
}

/// Thin wrapper so `Circuit` methods can take `&EventSink` without pulling
/// in `scrape_core::events::EventListeners`'s generic parameter at every
/// call site.
#[derive(Default)]
pub struct EventSink(pub EventListeners<CircuitBreakerEvent>);

impl EventSink {
    pub fn emit(&self, event: CircuitBreakerEvent) {
        self.0.emit(&event);
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: scrape_core::events::EventListener<CircuitBreakerEvent> + 'static,
    {
        self.0.add(listener);
    }
}
