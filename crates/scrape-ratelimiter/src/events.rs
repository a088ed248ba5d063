//! Lifecycle events emitted by [`crate::RateLimiter`].

use scrape_core::events::ScrapeEvent;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum RateLimiterEvent {
    DelayComputed {
        domain: String,
        delay: Duration,
    },
    SuccessRecorded {
        domain: String,
        new_delay: Duration,
    },
    FailureRecorded {
        domain: String,
        blocked: bool,
        new_delay: Duration,
    },
    DelaysWidened {
        factor: f64,
        domain_count: usize,
    },
}

impl ScrapeEvent for RateLimiterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RateLimiterEvent::DelayComputed { .. } => "delay_computed",
            RateLimiterEvent::SuccessRecorded { .. } => "success_recorded",
            RateLimiterEvent::FailureRecorded { .. } => "failure_recorded",
            RateLimiterEvent::DelaysWidened { .. } => "delays_widened",
        }
    }

    fn timestamp(&self) -> Instant {
        Instant::now()
    }

    fn pattern_name(&self) -> &str {
        match self {
            RateLimiterEvent::DelayComputed { domain, .. }
            | RateLimiterEvent::SuccessRecorded { domain, .. }
            | RateLimiterEvent::FailureRecorded { domain, .. } => domain,
            RateLimiterEvent::DelaysWidened { .. } => "*",
        }
    }
}
