//! Schema-validated Kafka channel producers for transit events.
//!
//! A channel is a named, partitioned Kafka topic governed by a
//! (key, value) schema pair. This crate provides:
//!
//! - Channel naming: deterministic, broker-legal names derived from
//!   human-readable entity names, with a version suffix for schema evolution
//! - Idempotent creation: a process-wide registry guarantees at most one
//!   creation request per channel name, and "already exists" is success
//! - Schema-validated publishing: key and value records are validated and
//!   encoded against the channel's declared schema pair before anything is
//!   handed to the client
//! - Fire-and-forget delivery: publishes enqueue without awaiting broker
//!   acknowledgment; close flushes whatever is still buffered
//!
//! Producers are held behind the [`EventChannel`] trait so stations compose
//! with a channel handle instead of extending a producer base type.

pub mod descriptor;
pub mod error;
pub mod naming;
pub mod producer;
pub mod registry;

pub use descriptor::ChannelDescriptor;
pub use error::{ChannelError, Result};
pub use naming::{channel_name, normalize_entity_name, NAMESPACE};
pub use producer::{ChannelProducer, EventChannel};
