use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "kafka")]
    #[error("kafka send failed: {0}")]
    Kafka(String),

    #[error("sink unavailable: {reason}")]
    Unavailable { reason: String },
}
