//! Kafka-backed channel producer.

use crate::descriptor::ChannelDescriptor;
use crate::error::{ChannelError, Result};
use crate::registry;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::ClientConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use transit_schema::{EventRecord, Record, SchemaPair};

/// Operations a station needs from its event channel.
///
/// Stations hold a channel handle behind this trait rather than extending a
/// producer base type; tests substitute an in-memory implementation.
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Idempotently make sure the channel exists on the broker.
    async fn ensure_exists(&self) -> Result<()>;

    /// Validate `key` and `value` against the channel's schema pair and hand
    /// the encoded message to the client's send path.
    async fn publish(&self, key: Record, value: Record) -> Result<()>;

    /// Flush buffered messages and release the client. Safe to call more
    /// than once.
    async fn close(&self) -> Result<()>;
}

/// Owns one named channel: lazy idempotent creation, schema-validated
/// publishing, and flush-on-close.
pub struct ChannelProducer {
    descriptor: ChannelDescriptor,
    schemas: SchemaPair,
    producer: FutureProducer,
    admin: AdminClient<DefaultClientContext>,
    closed: AtomicBool,
}

impl ChannelProducer {
    /// Build a producer bound to one descriptor and one schema pair.
    ///
    /// No broker call is made here; the channel is created lazily when the
    /// first publish needs it.
    pub fn create(brokers: &str, descriptor: ChannelDescriptor, schemas: SchemaPair) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .create()?;

        Ok(ChannelProducer {
            descriptor,
            schemas,
            producer,
            admin,
            closed: AtomicBool::new(false),
        })
    }

    /// Validate, encode, and publish one typed event.
    pub async fn publish_event<K, V>(&self, key: &K, value: &V) -> Result<()>
    where
        K: EventRecord + Sync,
        V: EventRecord + Sync,
    {
        self.publish(key.to_record(), value.to_record()).await
    }

    /// The descriptor this producer was bound to.
    pub fn descriptor(&self) -> &ChannelDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl EventChannel for ChannelProducer {
    async fn ensure_exists(&self) -> Result<()> {
        // The first claimant in the process issues the creation request;
        // everyone else sees the name already claimed and returns.
        if !registry::claim(self.descriptor.name()) {
            return Ok(());
        }

        let topic = NewTopic::new(
            self.descriptor.name(),
            self.descriptor.partitions(),
            TopicReplication::Fixed(self.descriptor.replicas()),
        );
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));

        let results = match self.admin.create_topics(&[topic], &opts).await {
            Ok(results) => results,
            Err(e) => {
                registry::release(self.descriptor.name());
                return Err(ChannelError::Creation {
                    channel: self.descriptor.name().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        for result in results {
            match result {
                Ok(name) => {
                    tracing::info!("Channel '{name}' created");
                }
                Err((name, code)) => {
                    // Pre-existence is success for idempotent creation
                    if code == RDKafkaErrorCode::TopicAlreadyExists {
                        tracing::info!("Channel '{name}' already exists");
                    } else {
                        registry::release(self.descriptor.name());
                        return Err(ChannelError::Creation {
                            channel: name,
                            reason: code.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    async fn publish(&self, key: Record, value: Record) -> Result<()> {
        self.ensure_exists().await?;

        let key_bytes = self.schemas.key.encode(&key)?;
        let value_bytes = self.schemas.value.encode(&value)?;

        let record = FutureRecord::to(self.descriptor.name())
            .key(&key_bytes)
            .payload(&value_bytes);

        // Enqueue without awaiting delivery; the client's background thread
        // owns the send, and close() flushes whatever is still buffered.
        let _delivery = self
            .producer
            .send_result(record)
            .map_err(|(err, _)| ChannelError::Enqueue {
                channel: self.descriptor.name().to_string(),
                reason: err.to_string(),
            })?;

        tracing::debug!("Enqueued event on '{}'", self.descriptor.name());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.producer
            .flush(Duration::from_secs(10))
            .map_err(|e| ChannelError::Close(e.to_string()))?;

        tracing::debug!("Closed channel '{}'", self.descriptor.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transit_schema::MessageSchema;

    const KEY_PROTO: &str = r#"
syntax = "proto3";

message TimestampKey {
  int64 timestamp = 1;
}
"#;

    fn test_schemas() -> SchemaPair {
        let key = MessageSchema::parse(KEY_PROTO, "TimestampKey").unwrap();
        SchemaPair {
            value: key.clone(),
            key,
        }
    }

    #[test]
    fn test_create_has_no_broker_side_effect() {
        // Client construction is lazy; no broker is running here.
        let descriptor =
            ChannelDescriptor::new("org.chicago.cta.test.create_lazy.v1", 1, 1).unwrap();
        let producer = ChannelProducer::create("localhost:9092", descriptor, test_schemas());
        assert!(producer.is_ok());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let descriptor =
            ChannelDescriptor::new("org.chicago.cta.test.close_twice.v1", 1, 1).unwrap();
        let producer =
            ChannelProducer::create("localhost:9092", descriptor, test_schemas()).unwrap();

        assert!(producer.close().await.is_ok());
        assert!(producer.close().await.is_ok());
    }
}
