//! Kafka-backed [`EventSink`], grounded on
//! `original_source/.../kafka.py`'s `KafkaProducerManager` (bootstrap
//! servers, `acks=all`, its own 3-retry producer config) but built on
//! `rdkafka`'s `FutureProducer` rather than `aiokafka`. Gated behind the
//! `kafka` feature so the default build never pulls in `librdkafka`.

use crate::envelope::Envelope;
use crate::error::PublishError;
use crate::sink::EventSink;
use crate::topic::Topic;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use std::time::Duration;

pub struct KafkaSink {
    producer: FutureProducer,
}

impl KafkaSink {
    /// `bootstrap_servers` mirrors `KAFKA_BOOTSTRAP_SERVERS` (comma-separated
    /// host:port list) from the source settings module.
    pub fn new(bootstrap_servers: &str) -> Result<Self, PublishError> {
        let producer = ClientConfig::new()
            .set("bootstrap.servers", bootstrap_servers)
            .set("acks", "all")
            .set("message.timeout.ms", "30000")
            .create()
            .map_err(|e| PublishError::Kafka(e.to_string()))?;
        Ok(Self { producer })
    }
}

#[async_trait]
impl EventSink for KafkaSink {
    async fn publish(&self, topic: Topic, key: Option<&str>, envelope: &Envelope) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(envelope)?;
        let mut record = FutureRecord::to(topic.as_str()).payload(&payload);
        if let Some(key) = key {
            record = record.key(key);
        }
        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(err, _)| PublishError::Kafka(err.to_string()))?;
        Ok(())
    }
}
