//! Append-only local log sink: the default transport for tests and for
//! operators running without a broker. One JSON line per published
//! envelope, prefixed with its topic.

use crate::envelope::Envelope;
use crate::error::PublishError;
use crate::sink::EventSink;
use crate::topic::Topic;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct JsonlSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl EventSink for JsonlSink {
    async fn publish(&self, topic: Topic, key: Option<&str>, envelope: &Envelope) -> Result<(), PublishError> {
        let line = serde_json::to_string(&serde_json::json!({
            "topic": topic.as_str(),
            "key": key,
            "envelope": envelope,
        }))?;

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_appends_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let sink = JsonlSink::new(&path);

        let envelope = Envelope::new("job_scraped", serde_json::json!({"id": "j1"}));
        sink.publish(Topic::Jobs, Some("job_j1"), &envelope).await.unwrap();
        sink.publish(Topic::Jobs, Some("job_j2"), &envelope).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("\"topic\":\"jobs\""));
    }
}
