//! [`ScraperContract`] — the minimal capability set every backend instance
//! conforms to (spec.md §4.4, §6). The pool shuttles instances behind this
//! trait and never downcasts to a concrete scraper type; backend selection
//! (spec.md §4.7) happens one layer up, in the orchestrator, not here.
//!
//! The individual scraper implementations (HTML parsing, login flows,
//! CAPTCHA handling) are deliberately out of scope (spec.md §1) — this
//! crate only defines the contract and the pool that manages instances
//! conforming to it.

use async_trait::async_trait;
use scrape_core::{ScrapeError, ScrapeOutcome, ScrapeRequest};
use tokio_util::sync::CancellationToken;

/// A single scraper backend instance.
///
/// `scrape` may be long-running and MUST honor `cancel`: when the token is
/// cancelled, the call is expected to abort its outbound I/O and return
/// promptly rather than run to completion (spec.md §5).
#[async_trait]
pub trait ScraperContract: Send + Sync {
    async fn scrape(
        &self,
        request: &ScrapeRequest,
        cancel: CancellationToken,
    ) -> Result<ScrapeOutcome, ScrapeError>;

    /// Clears per-call state (cookies, cursors, cache handles) before the
    /// instance is returned to the pool's available FIFO. Default: no-op,
    /// for stateless backends (e.g. a plain HTTP client wrapper).
    async fn reset(&self) {}
}

/// Creates new [`ScraperContract`] instances on demand for one backend
/// kind's pool. Kept separate from the contract itself so a pool can grow
/// its instance count without the contract needing a `Clone` bound.
#[async_trait]
pub trait ScraperFactory: Send + Sync {
    async fn create(&self) -> Box<dyn ScraperContract>;
}

/// Builds a [`ScraperFactory`] from a plain closure, for backends with no
/// async setup (the common case for stub/mock instances in tests).
pub struct FnFactory<F>(pub F);

#[async_trait]
impl<F> ScraperFactory for FnFactory<F>
where
    F: Fn() -> Box<dyn ScraperContract> + Send + Sync,
{
    async fn create(&self) -> Box<dyn ScraperContract> {
        (self.0)()
    }
}
