//! Ordering for queued tasks (spec.md §4.5): keyed on `(priority,
//! created_at)`, ties broken FIFO. `Task::priority` is 1..=10 with 1 most
//! urgent, so the natural `BinaryHeap` (a max-heap) needs a reversed `Ord`
//! to surface the lowest priority number, earliest `created_at`, first.

use scrape_core::Task;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct QueueEntry(pub Task);

impl QueueEntry {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority && self.0.created_at == other.0.created_at
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap::pop returns the "greatest" element, and we
        // want the lowest priority number / earliest created_at to pop first.
        other
            .0
            .priority
            .cmp(&self.0.priority)
            .then_with(|| other.0.created_at.cmp(&self.0.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn task_at(priority: u8, created_at: SystemTime) -> Task {
        let mut t = Task::new("t", "indeed", priority);
        t.created_at = created_at;
        t
    }

    #[test]
    fn lower_priority_number_orders_greater_for_max_heap_pop() {
        let now = SystemTime::now();
        let urgent = QueueEntry(task_at(1, now));
        let relaxed = QueueEntry(task_at(9, now));
        assert!(urgent > relaxed);
    }

    #[test]
    fn equal_priority_breaks_ties_by_earlier_created_at() {
        let now = SystemTime::now();
        let earlier = QueueEntry(task_at(5, now));
        let later = QueueEntry(task_at(5, now + Duration::from_secs(1)));
        assert!(earlier > later);
    }
}
