//! Lifecycle events emitted by [`crate::Pool`], built on `scrape_core::events`
//! the way every observable component in the workspace is.

use scrape_core::events::ScrapeEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum PoolEvent {
    InstanceCreated {
        kind: String,
        timestamp: Instant,
        total_created: usize,
    },
    Acquired {
        kind: String,
        timestamp: Instant,
        in_use: usize,
    },
    Released {
        kind: String,
        timestamp: Instant,
        in_use: usize,
    },
    Exhausted {
        kind: String,
        timestamp: Instant,
    },
}

impl ScrapeEvent for PoolEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PoolEvent::InstanceCreated { .. } => "instance_created",
            PoolEvent::Acquired { .. } => "acquired",
            PoolEvent::Released { .. } => "released",
            PoolEvent::Exhausted { .. } => "exhausted",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            PoolEvent::InstanceCreated { timestamp, .. }
            | PoolEvent::Acquired { timestamp, .. }
            | PoolEvent::Released { timestamp, .. }
            | PoolEvent::Exhausted { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            PoolEvent::InstanceCreated { kind, .. }
            | PoolEvent::Acquired { kind, .. }
            | PoolEvent::Released { kind, .. }
            | PoolEvent::Exhausted { kind, .. } => kind,
        }
    }
}
