//! Fixed backoff schedules for the scrape control plane.
//!
//! Two call sites want a literal, non-parameterized backoff: spec.md §7's
//! "transient network ... retried locally by the backend up to 3 times"
//! and §4.9's event publisher retry ("3 attempts, exponential backoff
//! 100ms/400ms/1600ms"). Both are a fixed list of delays, not a
//! generically-configurable exponential curve, so that's all this crate
//! provides — [`backoff::publisher_schedule`] and the general
//! [`backoff::fixed_sequence`] it's built from.

pub mod backoff;
