//! [`WorkerSet`] — C6, the cooperative pool of workers draining C5
//! (spec.md §4.6). Scaling (§4.7's scaling loop) and cancellation (§4.7,
//! §5) both act here; workers never reach back into the orchestrator —
//! they only hold `queue`, `handler`, and the shared event channel.

use crate::events::WorkerEvent;
use crate::handler::TaskHandler;
use crate::worker::{run_worker, InFlightMap};
use scrape_queue::TaskQueue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct WorkerHandle {
    id: String,
    token: CancellationToken,
    join: JoinHandle<()>,
}

/// N cooperatively scheduled workers (default `max_concurrent_scrapers`,
/// range 5-50 per spec.md §5).
pub struct WorkerSet {
    queue: Arc<TaskQueue>,
    handler: Arc<dyn TaskHandler>,
    events_tx: mpsc::UnboundedSender<WorkerEvent>,
    workers: Mutex<Vec<WorkerHandle>>,
    in_flight: InFlightMap,
    next_id: AtomicUsize,
}

impl WorkerSet {
    pub fn new(
        queue: Arc<TaskQueue>,
        handler: Arc<dyn TaskHandler>,
    ) -> (Self, mpsc::UnboundedReceiver<WorkerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                queue,
                handler,
                events_tx: tx,
                workers: Mutex::new(Vec::new()),
                in_flight: Arc::new(Mutex::new(HashMap::new())),
                next_id: AtomicUsize::new(0),
            },
            rx,
        )
    }

    /// Spawns `count` workers immediately (startup path; spec.md §4.6).
    pub async fn start(&self, count: usize) {
        let mut workers = self.workers.lock().await;
        for _ in 0..count {
            workers.push(self.spawn_one());
        }
    }

    fn spawn_one(&self) -> WorkerHandle {
        let id = format!("worker-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let token = CancellationToken::new();
        let join = tokio::spawn(run_worker(
            id.clone(),
            Arc::clone(&self.queue),
            Arc::clone(&self.handler),
            self.events_tx.clone(),
            token.clone(),
            Arc::clone(&self.in_flight),
        ));
        WorkerHandle { id, token, join }
    }

    /// The scaling loop's action (spec.md §4.7): grow by 5 up to `max`, or
    /// shrink by 5 down to a floor of 5, whichever the caller computed.
    pub async fn scale_to(&self, target: usize) {
        let mut workers = self.workers.lock().await;
        while workers.len() < target {
            workers.push(self.spawn_one());
        }
        while workers.len() > target {
            if let Some(handle) = workers.pop() {
                handle.token.cancel();
            }
        }
    }

    pub async fn worker_count(&self) -> usize {
        self.workers.lock().await.len()
    }

    /// Count of workers whose task hasn't finished — spec.md §4.8's
    /// "check worker health" / `active_workers` figure.
    pub async fn active_count(&self) -> usize {
        self.workers
            .lock()
            .await
            .iter()
            .filter(|w| !w.join.is_finished())
            .count()
    }

    /// Respawns any worker whose task exited unexpectedly. Intended to be
    /// driven by C8's 60s tick ("supervisor spawns a replacement within
    /// one health-monitor tick", spec.md §4.6).
    pub async fn reap_and_respawn(&self) {
        let mut workers = self.workers.lock().await;
        for handle in workers.iter_mut() {
            if handle.join.is_finished() {
                let _ = self.events_tx.send(WorkerEvent::WorkerDied {
                    worker_id: handle.id.clone(),
                });
                *handle = self.spawn_one();
            }
        }
    }

    /// `cancel(task_id)` (spec.md §4.7, §5): removes a pending task from
    /// the queue outright, or signals the in-flight worker's cancellation
    /// token so it propagates into the backend and `C2.await` within the
    /// ≤50ms bound spec.md §8's scenario 6 requires.
    pub async fn cancel_task(&self, task_id: &str) -> bool {
        if self.queue.remove(task_id).await.is_some() {
            return true;
        }
        let in_flight = self.in_flight.lock().await;
        if let Some(token) = in_flight.get(task_id) {
            token.cancel();
            true
        } else {
            false
        }
    }

    /// Hierarchical shutdown (spec.md §5): cancels every worker's token,
    /// which cancels its current scrape in turn, then waits for all
    /// worker tasks to return.
    pub async fn shutdown(&self) {
        let mut workers = self.workers.lock().await;
        for handle in workers.iter() {
            handle.token.cancel();
        }
        for handle in workers.drain(..) {
            let _ = handle.join.await;
        }
    }
}
