//! [`EventSink`] is the seam between C9's retry/backoff wrapper and the
//! actual transport. The event-bus transport itself is out of scope for
//! behavior (spec.md §1's persistence non-goal analog), so the crate
//! ships one concrete default ([`crate::jsonl::JsonlSink`]) and an
//! optional `kafka`-feature-gated one.

use crate::envelope::Envelope;
use crate::error::PublishError;
use crate::topic::Topic;
use async_trait::async_trait;

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, topic: Topic, key: Option<&str>, envelope: &Envelope) -> Result<(), PublishError>;
}
