//! [`TaskQueue`]: thread-safe priority queue with condition-variable-style
//! blocking pop (spec.md §4.5).

use crate::entry::QueueEntry;
use scrape_core::Task;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Notify};

/// C5: priority queue of pending scrape tasks, keyed on `(priority,
/// created_at)`. Workers block on [`TaskQueue::pop`] until a task arrives
/// or the timeout elapses; pushes wake all waiters so they can race for
/// the newly visible head.
pub struct TaskQueue {
    heap: Mutex<BinaryHeap<QueueEntry>>,
    notify: Notify,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
        }
    }

    pub async fn push(&self, task: Task) {
        let mut heap = self.heap.lock().await;
        heap.push(QueueEntry(task));
        drop(heap);
        self.notify.notify_waiters();
    }

    /// Blocks until a task is available or `timeout` elapses, whichever
    /// comes first. Returns `None` on timeout, never on an empty-but-alive
    /// queue (the caller distinguishes "nothing to do right now" from
    /// "queue is gone" by the process staying up).
    pub async fn pop(&self, timeout: Duration) -> Option<Task> {
        let start = Instant::now();
        loop {
            let notified = self.notify.notified();
            {
                let mut heap = self.heap.lock().await;
                if let Some(entry) = heap.pop() {
                    return Some(entry.0);
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return None;
            }
            let remaining = timeout - elapsed;

            tokio::select! {
                _ = notified => {}
                _ = tokio::time::sleep(remaining) => return None,
            }
        }
    }

    pub async fn peek(&self) -> Option<Task> {
        let heap = self.heap.lock().await;
        heap.peek().map(|entry| entry.0.clone())
    }

    pub async fn size(&self) -> usize {
        self.heap.lock().await.len()
    }

    /// Removes the task with the given id, used by `cancel` (spec.md §4.6).
    pub async fn remove(&self, id: &str) -> Option<Task> {
        let mut heap = self.heap.lock().await;
        let items: Vec<QueueEntry> = std::mem::take(&mut *heap).into_vec();
        let (matched, rest): (Vec<_>, Vec<_>) =
            items.into_iter().partition(|entry| entry.id() == id);
        *heap = rest.into_iter().collect();
        matched.into_iter().next().map(|entry| entry.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn task(id: &str, priority: u8) -> Task {
        Task::new(id, "indeed", priority)
    }

    #[tokio::test]
    async fn pops_highest_priority_first() {
        let queue = TaskQueue::new();
        queue.push(task("low", 9)).await;
        queue.push(task("urgent", 1)).await;
        queue.push(task("mid", 5)).await;

        assert_eq!(queue.pop(StdDuration::from_millis(10)).await.unwrap().id, "urgent");
        assert_eq!(queue.pop(StdDuration::from_millis(10)).await.unwrap().id, "mid");
        assert_eq!(queue.pop(StdDuration::from_millis(10)).await.unwrap().id, "low");
    }

    #[tokio::test]
    async fn equal_priority_is_fifo() {
        let queue = TaskQueue::new();
        queue.push(task("first", 5)).await;
        tokio::time::sleep(StdDuration::from_millis(5)).await;
        queue.push(task("second", 5)).await;

        assert_eq!(queue.pop(StdDuration::from_millis(10)).await.unwrap().id, "first");
        assert_eq!(queue.pop(StdDuration::from_millis(10)).await.unwrap().id, "second");
    }

    #[tokio::test]
    async fn pop_times_out_on_empty_queue() {
        let queue = TaskQueue::new();
        let start = Instant::now();
        assert!(queue.pop(StdDuration::from_millis(30)).await.is_none());
        assert!(start.elapsed() >= StdDuration::from_millis(25));
    }

    #[tokio::test]
    async fn pop_wakes_promptly_on_push() {
        let queue = std::sync::Arc::new(TaskQueue::new());
        let q2 = queue.clone();
        let handle = tokio::spawn(async move { q2.pop(StdDuration::from_secs(5)).await });

        tokio::time::sleep(StdDuration::from_millis(20)).await;
        queue.push(task("late", 3)).await;

        let popped = tokio::time::timeout(StdDuration::from_millis(200), handle)
            .await
            .expect("pop should wake before the test timeout")
            .unwrap();
        assert_eq!(popped.unwrap().id, "late");
    }

    #[tokio::test]
    async fn remove_takes_task_out_by_id() {
        let queue = TaskQueue::new();
        queue.push(task("keep", 5)).await;
        queue.push(task("cancel-me", 5)).await;

        let removed = queue.remove("cancel-me").await;
        assert_eq!(removed.unwrap().id, "cancel-me");
        assert_eq!(queue.size().await, 1);
        assert_eq!(queue.pop(StdDuration::from_millis(10)).await.unwrap().id, "keep");
    }
}
