//! Wraps any [`EventSink`] with the in-process retry schedule spec.md
//! §4.9 specifies: "at-least-once with in-process retry (3 attempts,
//! exponential backoff 100ms/400ms/1600ms)". Grounded on `scrape-retry`'s
//! fixed backoff sequence rather than its generic policy/predicate layer —
//! publication has exactly one failure mode (the sink errored) and one
//! schedule, no per-call predicate needed.

use crate::envelope::Envelope;
use crate::error::PublishError;
use crate::sink::EventSink;
use crate::topic::Topic;
use async_trait::async_trait;
use scrape_retry::backoff::publisher_schedule;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::warn;

/// Retries a publish up to `schedule.len()` additional times after the
/// first attempt, sleeping the fixed schedule between attempts. The final
/// failure is returned to the caller; order within one task's records is
/// preserved because the caller awaits each publish before issuing the
/// next (spec.md §5).
pub struct RetryingSink<S> {
    inner: S,
    schedule: Vec<Duration>,
}

impl<S: EventSink> RetryingSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            schedule: publisher_schedule(),
        }
    }

    pub fn with_schedule(inner: S, schedule: Vec<Duration>) -> Self {
        Self { inner, schedule }
    }
}

#[async_trait]
impl<S: EventSink> EventSink for RetryingSink<S> {
    async fn publish(&self, topic: Topic, key: Option<&str>, envelope: &Envelope) -> Result<(), PublishError> {
        let mut last_err = None;
        for (attempt, delay) in std::iter::once(None)
            .chain(self.schedule.iter().copied().map(Some))
            .enumerate()
        {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match self.inner.publish(topic, key, envelope).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    warn!(attempt, topic = topic.as_str(), %err, "publish attempt failed");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.expect("at least one publish attempt always runs"))
    }
}
