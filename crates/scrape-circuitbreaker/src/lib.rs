//! Per-domain circuit breaker registry (C1) for the scrape control plane.
//!
//! Gates outbound calls per target domain with a CLOSED/OPEN/HALF_OPEN state
//! machine (spec.md §4.1). Unlike a generic Tower middleware circuit
//! breaker, this crate has no opinion about *what* is being called — the
//! orchestrator calls [`Registry::before_call`] before dispatching a scrape,
//! and [`Registry::on_success`]/[`Registry::on_failure`] after it returns.
//!
//! ## Example
//!
//! ```
//! # use scrape_circuitbreaker::{Registry, CircuitBreakerConfig};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = Registry::new(CircuitBreakerConfig::default());
//! if registry.before_call("linkedin.com").await.is_ok() {
//!     // ... perform the scrape ...
//!     registry.on_success("linkedin.com").await;
//! }
//! # }
//! ```

mod circuit;
mod config;
mod error;
mod events;
mod registry;

pub use circuit::CircuitState;
pub use config::{CircuitBreakerConfig, CircuitBreakerConfigBuilder};
pub use error::CircuitOpen;
pub use events::CircuitBreakerEvent;
pub use registry::Registry;
