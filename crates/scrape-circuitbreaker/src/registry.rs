//! [`Registry`] — C1, the owned-not-global circuit breaker registry.
//!
//! Every other crate in the workspace is handed an `Arc<Registry>` by the
//! orchestrator; nothing here is a process-wide singleton
//! (`original_source/.../circuit_breaker.py`'s module-level
//! `circuit_breaker_manager` is the anti-pattern spec.md §9 flags).

use crate::circuit::Circuit;
pub use crate::circuit::CircuitState;
use crate::config::CircuitBreakerConfig;
use crate::error::CircuitOpen;
use crate::events::{CircuitBreakerEvent, EventSink};
use scrape_core::events::EventListener;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

/// Per-domain circuit breaker registry.
///
/// Domains are created lazily on first reference and live for the process
/// lifetime (spec.md §3). The outer `Mutex` only ever guards the map's
/// shape (insert-if-absent) — it is never held across a network call; each
/// domain's actual state lives behind its own `Mutex<Circuit>`, the
/// per-domain-mutex concurrency model spec.md §5 requires.
pub struct Registry {
    config: CircuitBreakerConfig,
    circuits: AsyncMutex<HashMap<String, Arc<AsyncMutex<Circuit>>>>,
    events: EventSink,
}

impl Registry {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            circuits: AsyncMutex::new(HashMap::new()),
            events: EventSink::default(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: EventListener<CircuitBreakerEvent> + 'static,
    {
        self.events.add_listener(listener);
    }

    async fn get_or_create(&self, domain: &str) -> Arc<AsyncMutex<Circuit>> {
        let mut circuits = self.circuits.lock().await;
        circuits
            .entry(domain.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(Circuit::new(domain))))
            .clone()
    }

    /// `beforeCall(domain)`: a token on success (the domain's presence is
    /// enough; there is nothing to hold), `CircuitOpen` on refusal.
    pub async fn before_call(&self, domain: &str) -> Result<(), CircuitOpen> {
        let circuit = self.get_or_create(domain).await;
        let mut circuit = circuit.lock().await;
        if circuit.try_acquire(&self.config, &self.events) {
            Ok(())
        } else {
            Err(CircuitOpen {
                domain: domain.to_string(),
            })
        }
    }

    pub async fn on_success(&self, domain: &str) {
        let circuit = self.get_or_create(domain).await;
        let mut circuit = circuit.lock().await;
        circuit.on_success(&self.config, &self.events);
    }

    pub async fn on_failure(&self, domain: &str) {
        let circuit = self.get_or_create(domain).await;
        let mut circuit = circuit.lock().await;
        circuit.on_failure(&self.config, &self.events);
    }

    /// Force a single domain back to CLOSED (the `reset_circuit` command).
    pub async fn reset(&self, domain: &str) {
        let circuit = self.get_or_create(domain).await;
        let mut circuit = circuit.lock().await;
        circuit.reset(&self.events);
    }

    /// Force every known domain OPEN — C8's error-rate cooldown
    /// (spec.md §4.8: "open all circuit breakers preemptively for 5
    /// minutes"). Domains not yet referenced are unaffected; they'll start
    /// CLOSED on first reference as usual.
    pub async fn force_open_all(&self) {
        let circuits = self.circuits.lock().await;
        for circuit in circuits.values() {
            let mut circuit = circuit.lock().await;
            circuit.force_open(&self.events);
        }
    }

    /// Operator introspection: which domains are currently OPEN.
    pub async fn open_domains(&self) -> Vec<String> {
        let circuits = self.circuits.lock().await;
        let mut open = Vec::new();
        for (domain, circuit) in circuits.iter() {
            if circuit.lock().await.state() == CircuitState::Open {
                open.push(domain.clone());
            }
        }
        open
    }

    pub async fn state_of(&self, domain: &str) -> CircuitState {
        let circuit = self.get_or_create(domain).await;
        circuit.lock().await.state()
    }
}
