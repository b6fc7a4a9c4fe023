//! Error types for channel creation, publishing, and shutdown.

use thiserror::Error;
use transit_schema::SchemaError;

/// Errors surfaced by channel operations.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The broker refused to create the channel for a reason other than
    /// pre-existence. Fatal to the construction of the owning producer.
    #[error("Channel '{channel}' creation failed: {reason}")]
    Creation { channel: String, reason: String },

    /// The key or value record did not conform to the channel's schema pair.
    /// The broker send path is never invoked for the offending publish.
    #[error("Schema validation failed: {0}")]
    Schema(#[from] SchemaError),

    /// The client rejected the message at enqueue time (e.g. full local
    /// buffer). Distinct from eventual-delivery failures, which are not
    /// surfaced at this layer.
    #[error("Failed to enqueue message on '{channel}': {reason}")]
    Enqueue { channel: String, reason: String },

    /// Failure while flushing and releasing the client.
    #[error("Failed to close channel: {0}")]
    Close(String),

    /// Kafka client construction or configuration error.
    #[error("Kafka client error: {0}")]
    Client(#[from] rdkafka::error::KafkaError),
}

/// Result type alias for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;
