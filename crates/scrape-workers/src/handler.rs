//! [`TaskHandler`] — the seam between the worker loop (C6) and everything
//! that actually executes a scrape (C7's `executeTask`, consulting
//! C1/C2/C3/C4). Workers hold an `Arc<dyn TaskHandler>` and nothing else
//! of the orchestrator — no back-reference, per spec.md §9's cyclic-ref
//! redesign flag. The orchestrator is the only thing that implements
//! this trait.

use async_trait::async_trait;
use scrape_core::{ScrapeError, ScrapeOutcome, Task};
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Executes one task to completion or failure. MUST honor `cancel`:
    /// if cancelled mid-flight, return `Err(ScrapeError::Cancelled { .. })`
    /// promptly rather than running the scrape to completion.
    async fn execute(&self, task: &Task, cancel: CancellationToken) -> Result<ScrapeOutcome, ScrapeError>;
}
