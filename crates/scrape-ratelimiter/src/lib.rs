//! Adaptive per-domain rate limiter for the scrape control plane (C2).
//!
//! Unlike a fixed-window Tower rate limiter, this crate tracks feedback
//! *per target domain* and adjusts the delay between requests based on
//! observed success rate, response time, and recent blocks (spec.md §4.2).
//! The orchestrator calls [`RateLimiter::wait`] before dispatching a scrape
//! and [`RateLimiter::record_success`]/[`RateLimiter::record_failure`]
//! after it returns.
//!
//! ## Example
//!
//! ```
//! # use scrape_ratelimiter::{RateLimiter, RateLimiterConfig};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let limiter = RateLimiter::new(RateLimiterConfig::default());
//! limiter.wait("linkedin.com", 5).await;
//! // ... perform the scrape ...
//! limiter.record_success("linkedin.com", None).await;
//! # }
//! ```

mod config;
mod events;
mod limiter;

pub use config::RateLimiterConfig;
pub use events::RateLimiterEvent;
pub use limiter::{DomainStats, RateLimiter};
