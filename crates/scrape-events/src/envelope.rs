//! [`Envelope`] mirrors `original_source/.../kafka.py`'s `KafkaMessage`
//! field set exactly (spec.md §4.9, §6): `message_id`, `ts`, `type`,
//! `data`, `source`, `metadata`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub message_id: String,
    pub ts: DateTime<Utc>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub data: serde_json::Value,
    pub source: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl Envelope {
    pub fn new(message_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            ts: Utc::now(),
            message_type: message_type.into(),
            data,
            source: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_type_field_under_its_renamed_key() {
        let envelope = Envelope::new("job_scraped", serde_json::json!({"id": "j1"}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["type"], "job_scraped");
        assert!(value.get("message_type").is_none());
    }
}
