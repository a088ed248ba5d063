//! The worker loop itself (spec.md §4.6): pop, dispatch, retry-or-publish.

use crate::events::WorkerEvent;
use crate::handler::TaskHandler;
use scrape_core::{Task, TaskStatus};
use scrape_queue::TaskQueue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Tasks currently in flight, keyed by id, so `cancel(task_id)` (spec.md
/// §4.7) can find the right token without the worker holding a
/// back-reference to anything beyond this shared map.
pub type InFlightMap = Arc<Mutex<HashMap<String, CancellationToken>>>;

const POP_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn run_worker(
    worker_id: String,
    queue: Arc<TaskQueue>,
    handler: Arc<dyn TaskHandler>,
    events: mpsc::UnboundedSender<WorkerEvent>,
    shutdown: CancellationToken,
    in_flight: InFlightMap,
) {
    let _ = events.send(WorkerEvent::WorkerStarted {
        worker_id: worker_id.clone(),
    });

    while !shutdown.is_cancelled() {
        let task = match queue.pop(POP_TIMEOUT).await {
            Some(task) => task,
            None => continue,
        };

        process_task(task, &queue, &handler, &events, &in_flight).await;
    }

    let _ = events.send(WorkerEvent::WorkerStopped { worker_id });
}

async fn process_task(
    mut task: Task,
    queue: &Arc<TaskQueue>,
    handler: &Arc<dyn TaskHandler>,
    events: &mpsc::UnboundedSender<WorkerEvent>,
    in_flight: &InFlightMap,
) {
    task.status = TaskStatus::InFlight;
    task.started_at = Some(SystemTime::now());

    let cancel = CancellationToken::new();
    in_flight
        .lock()
        .await
        .insert(task.id.clone(), cancel.clone());

    let start = Instant::now();
    let result = handler.execute(&task, cancel.clone()).await;
    in_flight.lock().await.remove(&task.id);
    let duration = start.elapsed();

    match result {
        Ok(outcome) => {
            task.status = TaskStatus::Completed;
            task.completed_at = Some(SystemTime::now());
            let _ = events.send(WorkerEvent::Completed {
                task,
                outcome,
                duration,
            });
        }
        Err(err) if err.is_cancelled() => {
            task.status = TaskStatus::Cancelled;
            task.completed_at = Some(SystemTime::now());
            let _ = events.send(WorkerEvent::Cancelled { task_id: task.id });
        }
        Err(err) if err.is_circuit_open() => {
            // Spec.md §7: circuit-open rejections don't consume retry
            // budget — they're a scheduling deferral, not a task failure.
            let resume_in = err.requeue_delay().unwrap_or(Duration::from_secs(30));
            let task_id = task.id.clone();
            task.priority = task.priority.saturating_add(1).min(10);
            task.status = TaskStatus::Pending;
            let _ = events.send(WorkerEvent::DeferredByCircuit {
                task_id,
                resume_in,
            });
            let queue = Arc::clone(queue);
            tokio::spawn(async move {
                tokio::time::sleep(resume_in).await;
                queue.push(task).await;
            });
        }
        Err(err) if err.is_retryable() && task.can_retry() => {
            task.retry_count += 1;
            task.priority = task.priority.saturating_add(1).min(10);
            task.status = TaskStatus::Pending;
            let _ = events.send(WorkerEvent::Retried {
                task_id: task.id.clone(),
                retry_count: task.retry_count,
            });
            queue.push(task).await;
        }
        Err(err) => {
            task.status = TaskStatus::Failed;
            task.completed_at = Some(SystemTime::now());
            task.error = Some(err.to_string());
            let _ = events.send(WorkerEvent::Failed {
                task,
                error: err,
                duration,
            });
        }
    }
}
