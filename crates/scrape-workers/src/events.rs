//! What a worker tells the rest of the system about a task it just
//! finished (spec.md §4.6). Carried over an `mpsc` channel, not a direct
//! call back into the orchestrator — the message-passing redesign
//! spec.md §9 calls for.

use scrape_core::{ScrapeError, ScrapeOutcome, Task};
use std::time::Duration;

#[derive(Debug)]
pub enum WorkerEvent {
    /// Task reached `completed`; carries the records for C9 fan-out and
    /// the duration for C8's rolling timing metrics.
    Completed {
        task: Task,
        outcome: ScrapeOutcome,
        duration: Duration,
    },
    /// Task reached `failed` after exhausting retries, or failed with a
    /// non-retryable error kind (parse drift, quota exhaustion with no
    /// fallback, a fatal host error).
    Failed {
        task: Task,
        error: ScrapeError,
        duration: Duration,
    },
    /// Requeued after a retryable failure (transient/blocked), still
    /// within `max_retries`.
    Retried { task_id: String, retry_count: u32 },
    /// Requeued after `CircuitOpen` without consuming retry budget —
    /// spec.md §7's "+1 priority penalty and +30s scheduled delay".
    DeferredByCircuit { task_id: String, resume_in: Duration },
    /// Task reached `cancelled` via `stop(task_id)`.
    Cancelled { task_id: String },
    /// A worker task panicked or otherwise died; the supervisor will
    /// respawn it within one health-monitor tick (spec.md §4.6).
    WorkerDied { worker_id: String },
    WorkerStarted { worker_id: String },
    WorkerStopped { worker_id: String },
}
