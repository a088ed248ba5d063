//! Fixed backoff sequences (spec.md §4.9, §7): "retried locally... up to 3
//! times" and the event publisher's literal 100/400/1600ms schedule both
//! want a small fixed list of delays, not a generically-parameterized
//! exponential curve.

use std::time::Duration;

/// Turns a literal list of millisecond delays into an attempt schedule.
/// `attempt` is 0-indexed; once past the end of `steps_ms` the last step
/// repeats (so callers can treat "attempt" as unbounded and still get a
/// sane delay).
pub fn fixed_sequence(steps_ms: &[u64]) -> Vec<Duration> {
    steps_ms.iter().map(|ms| Duration::from_millis(*ms)).collect()
}

/// The event publisher's retry schedule (spec.md §4.9): 100ms, 400ms, 1600ms.
pub fn publisher_schedule() -> Vec<Duration> {
    fixed_sequence(&[100, 400, 1600])
}

/// Delay for the given 0-indexed attempt, clamped to the last configured step.
pub fn delay_for_attempt(schedule: &[Duration], attempt: usize) -> Duration {
    schedule
        .get(attempt)
        .copied()
        .unwrap_or_else(|| schedule.last().copied().unwrap_or_default())
}
