//! Lifecycle and record publishing helpers (spec.md §4.9): `job_scraped`
//! per normalized record on the `jobs` topic, and the `scraping_started` /
//! `scraping_completed` / `anomaly_detected` lifecycle events on `events`,
//! matching the event names `original_source/.../kafka.py` publishes.

use scrape_core::JobRecord;
use scrape_events::{EventSink, Envelope, PublishError, Topic};
use serde_json::json;

/// Thin wrapper around a boxed [`EventSink`] naming the event types the
/// orchestrator itself produces, so [`crate::orchestrator::Orchestrator`]
/// and [`crate::handler::OrchestratorHandler`] don't build `Envelope`s
/// inline at every call site.
pub struct Publisher {
    sink: Box<dyn EventSink>,
}

impl Publisher {
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Publishes one `job_scraped` envelope per record, keyed by
    /// `job_<id>` on the `jobs` topic (spec.md §4.9).
    pub async fn publish_records(&self, records: &[JobRecord], source: &str) -> Result<(), PublishError> {
        for record in records {
            let envelope = Envelope::new("job_scraped", json!(record)).with_source(source);
            self.sink
                .publish(Topic::Jobs, Some(&scrape_events::job_key(&record.id)), &envelope)
                .await?;
        }
        Ok(())
    }

    pub async fn scraping_started(&self, task_id: &str, source: &str) -> Result<(), PublishError> {
        let envelope = Envelope::new("scraping_started", json!({ "task_id": task_id })).with_source(source);
        self.sink.publish(Topic::Events, None, &envelope).await
    }

    pub async fn scraping_completed(
        &self,
        task_id: &str,
        source: &str,
        record_count: usize,
    ) -> Result<(), PublishError> {
        let envelope = Envelope::new(
            "scraping_completed",
            json!({ "task_id": task_id, "record_count": record_count }),
        )
        .with_source(source);
        self.sink.publish(Topic::Events, None, &envelope).await
    }

    pub async fn anomaly_detected(&self, metric: &str, severity: &str, message: &str) -> Result<(), PublishError> {
        let envelope = Envelope::new(
            "anomaly_detected",
            json!({ "metric": metric, "severity": severity, "message": message }),
        );
        self.sink.publish(Topic::Events, None, &envelope).await
    }
}
