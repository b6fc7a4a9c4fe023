//! Runtime schema support for transit event channels.
//!
//! Every channel in the system declares a (key, value) pair of protobuf
//! message schemas. This crate parses those `.proto` definitions at runtime,
//! validates event records against them, and encodes conforming records to
//! the proto3 wire format. There is no code generation step: the schema text
//! lives next to the producers that publish against it.
//!
//! # Modules
//!
//! - [`schema`] - `.proto` parsing into [`MessageSchema`] descriptors
//! - [`record`] - the [`Record`]/[`FieldValue`] runtime representation and
//!   the [`EventRecord`] encode contract implemented by domain event types
//! - [`encode`] - validate-then-encode of records against a schema
//! - [`error`] - error types for parse, validation, and encoding failures

pub mod encode;
pub mod error;
pub mod record;
pub mod schema;

pub use error::{Result, SchemaError};
pub use record::{EventRecord, FieldValue, Record};
pub use schema::{FieldKind, FieldSchema, MessageSchema, SchemaPair};
