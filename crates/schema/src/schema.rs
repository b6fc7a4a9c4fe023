//! Runtime protobuf schema descriptors.
//!
//! Schemas are parsed from `.proto` source text when a producer family is
//! first constructed, so the message layout that governs a channel lives next
//! to the code that publishes to it without a code generation step.

use crate::error::{Result, SchemaError};
use protobuf::descriptor::field_descriptor_proto::{Label, Type};
use protobuf::descriptor::{FieldDescriptorProto, FileDescriptorProto};
use protobuf_parse::Parser;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

/// Scalar field kinds supported for event messages.
///
/// Events are flat records; nested messages, enums, and repeated fields are
/// rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bool,
    String,
    Bytes,
}

impl FieldKind {
    /// Human-readable kind name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint64 => "uint64",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Describes one declared field of a message.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Field number (wire tag)
    pub number: u32,
    /// Declared scalar kind
    pub kind: FieldKind,
}

/// Parsed descriptor for a single message type.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    name: String,
    fields: HashMap<String, FieldSchema>,
    field_order: Vec<String>,
}

impl MessageSchema {
    /// Parse `.proto` source text and extract the descriptor for `message`.
    pub fn parse(source: &str, message: &str) -> Result<Self> {
        let file_descriptor = parse_file_descriptor(source)?;

        let descriptor = file_descriptor
            .message_type
            .iter()
            .find(|m| m.name() == message)
            .ok_or_else(|| SchemaError::MessageNotFound(message.to_string()))?;

        let mut fields = HashMap::new();
        let mut field_order = Vec::new();

        for field in &descriptor.field {
            let field_name = field.name.clone().unwrap_or_default();
            if field_name.is_empty() {
                continue;
            }

            if field.label == Some(Label::LABEL_REPEATED.into()) {
                return Err(SchemaError::UnsupportedField {
                    message: message.to_string(),
                    field: field_name,
                    reason: "repeated fields are not supported".to_string(),
                });
            }

            let kind = scalar_kind(message, &field_name, field)?;

            field_order.push(field_name.clone());
            fields.insert(
                field_name.clone(),
                FieldSchema {
                    name: field_name,
                    number: field.number.unwrap_or(0) as u32,
                    kind,
                },
            );
        }

        tracing::debug!(
            "Parsed schema for message '{message}' with {} fields",
            field_order.len()
        );

        Ok(MessageSchema {
            name: message.to_string(),
            fields,
            field_order,
        })
    }

    /// The message type name this schema describes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// All field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_order
    }

    /// All field descriptors in declaration order.
    pub fn fields_in_order(&self) -> impl Iterator<Item = &FieldSchema> {
        self.field_order
            .iter()
            .filter_map(move |name| self.fields.get(name))
    }
}

/// The (key, value) schema contract for one channel family.
///
/// Parsed once per producer family and shared across instances; every publish
/// on the channel must conform to this pair.
#[derive(Debug, Clone)]
pub struct SchemaPair {
    /// Schema the message key is encoded against
    pub key: MessageSchema,
    /// Schema the message value is encoded against
    pub value: MessageSchema,
}

impl SchemaPair {
    /// Parse both halves of the pair from `.proto` source text.
    pub fn parse(
        key_source: &str,
        key_message: &str,
        value_source: &str,
        value_message: &str,
    ) -> Result<Self> {
        Ok(SchemaPair {
            key: MessageSchema::parse(key_source, key_message)?,
            value: MessageSchema::parse(value_source, value_message)?,
        })
    }
}

/// Parse `.proto` source text into a file descriptor.
fn parse_file_descriptor(source: &str) -> Result<FileDescriptorProto> {
    // protobuf-parse reads from disk, so stage the source in a temp file
    let mut temp_file = tempfile::Builder::new()
        .suffix(".proto")
        .tempfile()
        .map_err(|e| SchemaError::Parse(format!("Failed to create temp file: {e}")))?;
    temp_file
        .write_all(source.as_bytes())
        .map_err(|e| SchemaError::Parse(format!("Failed to write temp file: {e}")))?;
    let temp_path = temp_file.path();

    let mut parser = Parser::new();
    if let Some(parent) = temp_path.parent() {
        parser.include(parent);
    }
    parser.input(temp_path);

    let parsed = parser
        .parse_and_typecheck()
        .map_err(|e| SchemaError::Parse(e.to_string()))?;

    parsed
        .file_descriptors
        .into_iter()
        .next()
        .ok_or_else(|| SchemaError::Parse("No file descriptor found".to_string()))
}

/// Map a protobuf field descriptor to a supported scalar kind.
fn scalar_kind(message: &str, field_name: &str, field: &FieldDescriptorProto) -> Result<FieldKind> {
    let field_type = field
        .type_
        .ok_or_else(|| SchemaError::Parse(format!("Field '{field_name}' missing type")))?
        .enum_value_or_default();

    match field_type {
        Type::TYPE_DOUBLE => Ok(FieldKind::Double),
        Type::TYPE_FLOAT => Ok(FieldKind::Float),
        Type::TYPE_INT32 => Ok(FieldKind::Int32),
        Type::TYPE_INT64 => Ok(FieldKind::Int64),
        Type::TYPE_UINT32 => Ok(FieldKind::Uint32),
        Type::TYPE_UINT64 => Ok(FieldKind::Uint64),
        Type::TYPE_BOOL => Ok(FieldKind::Bool),
        Type::TYPE_STRING => Ok(FieldKind::String),
        Type::TYPE_BYTES => Ok(FieldKind::Bytes),
        other => Err(SchemaError::UnsupportedField {
            message: message.to_string(),
            field: field_name.to_string(),
            reason: format!("{other:?} fields are not supported"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRIVAL_PROTO: &str = r#"
syntax = "proto3";

package cta.events;

message ArrivalEvent {
  int32 station_id = 1;
  string train_id = 2;
  string direction = 3;
  string line = 4;
  string train_status = 5;
  int32 prev_station_id = 6;
  string prev_direction = 7;
}
"#;

    #[test]
    fn test_parse_flat_message() {
        let schema = MessageSchema::parse(ARRIVAL_PROTO, "ArrivalEvent").unwrap();

        assert_eq!(schema.name(), "ArrivalEvent");
        assert_eq!(schema.field_names().len(), 7);
        assert_eq!(schema.field_names()[0], "station_id");
        assert_eq!(schema.field_names()[6], "prev_direction");

        let train_id = schema.field("train_id").unwrap();
        assert_eq!(train_id.number, 2);
        assert_eq!(train_id.kind, FieldKind::String);

        let station_id = schema.field("station_id").unwrap();
        assert_eq!(station_id.number, 1);
        assert_eq!(station_id.kind, FieldKind::Int32);
    }

    #[test]
    fn test_parse_missing_message() {
        let err = MessageSchema::parse(ARRIVAL_PROTO, "DepartureEvent").unwrap_err();
        assert!(matches!(err, SchemaError::MessageNotFound(name) if name == "DepartureEvent"));
    }

    #[test]
    fn test_parse_rejects_repeated_fields() {
        let proto = r#"
syntax = "proto3";

message BadEvent {
  repeated string tags = 1;
}
"#;
        let err = MessageSchema::parse(proto, "BadEvent").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedField { field, .. } if field == "tags"
        ));
    }

    #[test]
    fn test_parse_rejects_nested_messages() {
        let proto = r#"
syntax = "proto3";

message Inner {
  string value = 1;
}

message Outer {
  Inner inner = 1;
}
"#;
        let err = MessageSchema::parse(proto, "Outer").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedField { field, .. } if field == "inner"
        ));
    }

    #[test]
    fn test_schema_pair_parse() {
        let key_proto = r#"
syntax = "proto3";

message TimestampKey {
  int64 timestamp = 1;
}
"#;
        let pair = SchemaPair::parse(key_proto, "TimestampKey", ARRIVAL_PROTO, "ArrivalEvent")
            .unwrap();

        assert_eq!(pair.key.name(), "TimestampKey");
        assert_eq!(pair.key.field("timestamp").unwrap().kind, FieldKind::Int64);
        assert_eq!(pair.value.name(), "ArrivalEvent");
    }
}
