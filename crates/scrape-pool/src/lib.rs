//! Bounded per-backend-kind scraper instance pool (C4) for the scrape
//! control plane.
//!
//! One [`Pool`] exists per [`scrape_core::BackendKind`], holding
//! interchangeable instances conforming to [`ScraperContract`]. The pool
//! does not interpret scrape results; it only shuttles instances between
//! callers (spec.md §4.4).
//!
//! ## Example
//!
//! ```
//! # use scrape_pool::{Pool, PoolConfig, contract::{FnFactory, ScraperContract}};
//! # use scrape_core::{ScrapeError, ScrapeOutcome, ScrapeRequest};
//! # use async_trait::async_trait;
//! # use std::sync::Arc;
//! # struct Stub;
//! # #[async_trait]
//! # impl ScraperContract for Stub {
//! #     async fn scrape(&self, _r: &ScrapeRequest, _c: tokio_util::sync::CancellationToken) -> Result<ScrapeOutcome, ScrapeError> {
//! #         Ok(ScrapeOutcome::default())
//! #     }
//! # }
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pool = Pool::new("rss", Arc::new(FnFactory(|| Box::new(Stub) as Box<dyn ScraperContract>)), PoolConfig::new(5));
//! pool.warm_up().await;
//! let lease = pool.acquire().await.unwrap();
//! pool.release(lease).await;
//! # }
//! ```

pub mod contract;
mod config;
mod error;
mod events;
mod pool;
mod registry;

pub use config::PoolConfig;
pub use contract::{FnFactory, ScraperContract, ScraperFactory};
pub use error::PoolError;
pub use events::PoolEvent;
pub use pool::{Pool, PoolLease};
pub use registry::PoolRegistry;
