//! Durable publication of scraped records and lifecycle events to an
//! external event bus (C9, spec.md §4.9).
//!
//! Three topics — [`Topic::Jobs`], [`Topic::Events`], [`Topic::Enrichment`]
//! — carry one [`Envelope`] shape each, field-for-field matching
//! `original_source/.../kafka.py`'s `KafkaMessage`. The transport itself is
//! a narrow [`EventSink`] trait: [`JsonlSink`] is the default (tests and
//! broker-less operators), an optional `kafka` feature adds
//! [`kafka::KafkaSink`]. Every publish goes through [`RetryingSink`], which
//! wraps any sink with the 3-attempt, 100/400/1600ms backoff spec.md §4.9
//! specifies and built from `scrape-retry`'s fixed schedule.

mod envelope;
mod error;
pub mod jsonl;
#[cfg(feature = "kafka")]
pub mod kafka;
mod retrying;
mod sink;
mod topic;

pub use envelope::Envelope;
pub use error::PublishError;
pub use jsonl::JsonlSink;
pub use retrying::RetryingSink;
pub use sink::EventSink;
pub use topic::{job_key, Topic};
