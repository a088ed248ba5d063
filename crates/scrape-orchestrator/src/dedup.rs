//! Process-local dedup cache (spec.md §4.7 step 8, §9's LRU redesign
//! flag): "the dedup LRU is a sized-bounded structure with an explicit
//! eviction policy (default 100k entries, ~30 days retention via a
//! secondary time-index)" — unlike the source's unbounded per-process
//! `seen_job_ids` set, this one actually evicts.
//!
//! Sharded by id hash (spec.md §5: "LRU deduplication cache: sharded by
//! id-hash for low contention"), the way `scrape-ratelimiter` and
//! `scrape-circuitbreaker` shard their per-domain state by key instead of
//! holding one lock over everything.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const SHARD_COUNT: usize = 16;
const DEFAULT_CAPACITY: usize = 100_000;
const DEFAULT_RETENTION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

struct Shard {
    seen: HashMap<String, Instant>,
    order: VecDeque<String>,
    capacity: usize,
    retention: Duration,
}

impl Shard {
    fn new(capacity: usize, retention: Duration) -> Self {
        Self {
            seen: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            retention,
        }
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some(oldest) = self.order.front() {
            match self.seen.get(oldest) {
                Some(inserted_at) if now.duration_since(*inserted_at) > self.retention => {
                    let id = self.order.pop_front().expect("front checked above");
                    self.seen.remove(&id);
                }
                _ => break,
            }
        }
    }

    fn evict_over_capacity(&mut self) {
        while self.seen.len() > self.capacity {
            if let Some(id) = self.order.pop_front() {
                self.seen.remove(&id);
            } else {
                break;
            }
        }
    }

    /// Returns `true` if `id` had not been seen before (a genuinely new
    /// record); `false` if it's a duplicate within the retention window.
    fn insert_if_new(&mut self, id: &str) -> bool {
        let now = Instant::now();
        self.evict_expired(now);
        if self.seen.contains_key(id) {
            return false;
        }
        self.seen.insert(id.to_string(), now);
        self.order.push_back(id.to_string());
        self.evict_over_capacity();
        true
    }
}

/// Bounded, sharded "have we published this job id before" cache.
pub struct DedupCache {
    shards: Vec<Mutex<Shard>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(total_capacity: usize) -> Self {
        Self::with_capacity_and_retention(total_capacity, DEFAULT_RETENTION)
    }

    pub fn with_capacity_and_retention(total_capacity: usize, retention: Duration) -> Self {
        let per_shard = (total_capacity / SHARD_COUNT).max(1);
        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(Shard::new(per_shard, retention)))
            .collect();
        Self { shards }
    }

    fn shard_for(&self, id: &str) -> &Mutex<Shard> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }

    /// `true` if `id` is new; records it either way's not needed — a
    /// duplicate is simply not re-inserted (no counter reset).
    pub fn insert_if_new(&self, id: &str) -> bool {
        let shard = self.shard_for(id);
        shard.lock().expect("dedup shard mutex poisoned").insert_if_new(id)
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_is_new_second_is_not() {
        let cache = DedupCache::new();
        assert!(cache.insert_if_new("job-1"));
        assert!(!cache.insert_if_new("job-1"));
    }

    #[test]
    fn distinct_ids_are_independent() {
        let cache = DedupCache::new();
        assert!(cache.insert_if_new("job-1"));
        assert!(cache.insert_if_new("job-2"));
    }

    #[test]
    fn over_capacity_evicts_the_oldest_entry_first() {
        let cache = DedupCache::with_capacity(SHARD_COUNT * 2);
        // force every id into the same shard by reusing the cache's own
        // shard_for routing indirectly: insert enough ids that some shard
        // must evict, then confirm the cache never exceeds bookkeeping.
        for i in 0..10_000 {
            cache.insert_if_new(&format!("job-{i}"));
        }
        // the oldest ids may have been evicted and are "new" again.
        assert!(!cache.insert_if_new("job-9999"));
    }

    #[test]
    fn zero_retention_treats_every_repeat_as_new() {
        let cache = DedupCache::with_capacity_and_retention(1000, Duration::from_secs(0));
        assert!(cache.insert_if_new("job-1"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.insert_if_new("job-1"));
    }
}
