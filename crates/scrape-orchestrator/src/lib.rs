//! The scrape control plane's composition root (C7, spec.md §3, §4.7).
//!
//! Everything else in the workspace — C1's circuit breaker registry, C2's
//! adaptive rate limiter, C3's quota ledger, C4's scraper instance pools,
//! C5's priority queue, C6's worker set, C8's health monitor, C9's event
//! publisher — is a standalone crate with no knowledge of the others.
//! [`Orchestrator`] is the one place that owns all of them and wires the
//! data flow spec.md §4.7's `executeTask` describes: resolve a domain,
//! gate on C1-C3, lease an instance from C4, scrape, record the outcome,
//! dedup, publish to C9, and feed C8's rolling metrics.
//!
//! Nothing here is a process-wide singleton (spec.md §9): every registry
//! is an owned `Arc` built once in [`Orchestrator::new`], not a module-level
//! global the way `original_source/`'s Python managers are.
//!
//! ```no_run
//! # use scrape_orchestrator::{Orchestrator, OrchestratorConfig};
//! # use scrape_events::JsonlSink;
//! # use std::collections::HashMap;
//! # use std::sync::Arc;
//! # #[tokio::main]
//! # async fn main() {
//! let sink = Box::new(JsonlSink::new("events.jsonl"));
//! let orchestrator = Arc::new(Orchestrator::new(
//!     OrchestratorConfig::default(),
//!     HashMap::new(),
//!     sink,
//! ));
//! orchestrator.start().await;
//! # }
//! ```

mod backend;
mod command;
mod config;
mod dedup;
mod domain;
mod handler;
mod hybrid;
mod metrics_source;
mod orchestrator;
mod publisher;

pub use backend::{quota_fallback_backend, select_backend};
pub use command::{dispatch, Command, StartPayload};
pub use config::OrchestratorConfig;
pub use domain::resolve_domain;
pub use handler::{HandlerSettings, OrchestratorHandler};
pub use orchestrator::Orchestrator;
pub use publisher::Publisher;
