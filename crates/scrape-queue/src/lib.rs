//! Priority task queue for the scrape control plane (C5).
//!
//! A `(priority, created_at)`-ordered queue of pending [`scrape_core::Task`]
//! with condition-variable-style blocking pop (spec.md §4.5). The worker
//! set (C6) owns re-queue-on-unavailable-backend semantics; this crate
//! only orders and hands out tasks.
//!
//! ## Example
//!
//! ```
//! # use scrape_queue::TaskQueue;
//! # use scrape_core::Task;
//! # use std::time::Duration;
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let queue = TaskQueue::new();
//! queue.push(Task::new("t1", "indeed", 3)).await;
//! let task = queue.pop(Duration::from_secs(1)).await;
//! assert!(task.is_some());
//! # }
//! ```

mod entry;
mod queue;

pub use entry::QueueEntry;
pub use queue::TaskQueue;
