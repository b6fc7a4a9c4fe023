//! Validate-then-encode of records to the proto3 wire format.
//!
//! Encoding follows the proto3 wire format: each field is written as a
//! (tag, value) pair where tag = (field_number << 3) | wire_type. The wire
//! types in use are 0 (varint), 1 (64-bit), 2 (length-delimited), and
//! 5 (32-bit).

use crate::error::{Result, SchemaError};
use crate::record::{FieldValue, Record};
use crate::schema::{FieldKind, FieldSchema, MessageSchema};
use protobuf::CodedOutputStream;

impl MessageSchema {
    /// Validate `record` against this schema and encode it.
    ///
    /// The record's message type must match, every declared field must be
    /// present with a value of the declared kind, and the record may not
    /// carry undeclared fields. Nothing is written until the whole record
    /// validates, so a rejected record never produces partial output.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        if record.message_type() != self.name() {
            return Err(SchemaError::MessageMismatch {
                expected: self.name().to_string(),
                actual: record.message_type().to_string(),
            });
        }

        for (name, _) in record.fields() {
            if self.field(name).is_none() {
                return Err(SchemaError::UnknownField {
                    message: self.name().to_string(),
                    field: name.clone(),
                });
            }
        }

        let mut ordered = Vec::with_capacity(self.field_names().len());
        for field in self.fields_in_order() {
            let value = record
                .get(&field.name)
                .ok_or_else(|| SchemaError::MissingField {
                    message: self.name().to_string(),
                    field: field.name.clone(),
                })?;
            check_kind(field, value)?;
            ordered.push((field, value));
        }

        let mut buffer = Vec::new();
        {
            let mut stream = CodedOutputStream::vec(&mut buffer);
            for (field, value) in ordered {
                write_field(&mut stream, field, value)?;
            }
            stream
                .flush()
                .map_err(|e| SchemaError::Encode(e.to_string()))?;
        }

        Ok(buffer)
    }
}

/// Check that a value's kind matches the field's declared kind.
fn check_kind(field: &FieldSchema, value: &FieldValue) -> Result<()> {
    let conforms = matches!(
        (field.kind, value),
        (FieldKind::Bool, FieldValue::Bool(_))
            | (FieldKind::Int32, FieldValue::Int32(_))
            | (FieldKind::Int64, FieldValue::Int64(_))
            | (FieldKind::Uint32, FieldValue::Uint32(_))
            | (FieldKind::Uint64, FieldValue::Uint64(_))
            | (FieldKind::Float, FieldValue::Float(_))
            | (FieldKind::Double, FieldValue::Double(_))
            | (FieldKind::String, FieldValue::String(_))
            | (FieldKind::Bytes, FieldValue::Bytes(_))
    );

    if conforms {
        Ok(())
    } else {
        Err(SchemaError::TypeMismatch {
            field: field.name.clone(),
            expected: field.kind.name().to_string(),
            actual: value.kind_name().to_string(),
        })
    }
}

/// Write one validated field at its declared field number.
fn write_field(
    stream: &mut CodedOutputStream,
    field: &FieldSchema,
    value: &FieldValue,
) -> Result<()> {
    let number = field.number;
    let written = match value {
        FieldValue::Bool(b) => stream.write_bool(number, *b),
        FieldValue::Int32(i) => stream.write_int32(number, *i),
        FieldValue::Int64(i) => stream.write_int64(number, *i),
        FieldValue::Uint32(u) => stream.write_uint32(number, *u),
        FieldValue::Uint64(u) => stream.write_uint64(number, *u),
        FieldValue::Float(f) => stream.write_float(number, *f),
        FieldValue::Double(d) => stream.write_double(number, *d),
        FieldValue::String(s) => stream.write_string(number, s),
        FieldValue::Bytes(b) => stream.write_bytes(number, b),
    };
    written.map_err(|e| SchemaError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protobuf::CodedInputStream;

    const KEY_PROTO: &str = r#"
syntax = "proto3";

message TimestampKey {
  int64 timestamp = 1;
}
"#;

    const VALUE_PROTO: &str = r#"
syntax = "proto3";

message ArrivalEvent {
  int32 station_id = 1;
  string train_id = 2;
  string direction = 3;
}
"#;

    fn arrival_schema() -> MessageSchema {
        MessageSchema::parse(VALUE_PROTO, "ArrivalEvent").unwrap()
    }

    #[test]
    fn test_encode_key() {
        let schema = MessageSchema::parse(KEY_PROTO, "TimestampKey").unwrap();
        let record = Record::new("TimestampKey").field("timestamp", 1_700_000_000_000i64);

        let encoded = schema.encode(&record).unwrap();

        let mut stream = CodedInputStream::from_bytes(&encoded);
        let tag = stream.read_raw_varint32().unwrap();
        assert_eq!(tag >> 3, 1); // field number 1
        assert_eq!(tag & 7, 0); // varint wire type
        assert_eq!(stream.read_int64().unwrap(), 1_700_000_000_000);
        assert!(stream.eof().unwrap());
    }

    #[test]
    fn test_encode_value_round_readable() {
        let schema = arrival_schema();
        let record = Record::new("ArrivalEvent")
            .field("station_id", 41380)
            .field("train_id", "T1")
            .field("direction", "a");

        let encoded = schema.encode(&record).unwrap();

        let mut stream = CodedInputStream::from_bytes(&encoded);

        let tag = stream.read_raw_varint32().unwrap();
        assert_eq!(tag >> 3, 1);
        assert_eq!(stream.read_int32().unwrap(), 41380);

        let tag = stream.read_raw_varint32().unwrap();
        assert_eq!(tag >> 3, 2);
        assert_eq!(tag & 7, 2); // length-delimited wire type
        assert_eq!(stream.read_string().unwrap(), "T1");

        let tag = stream.read_raw_varint32().unwrap();
        assert_eq!(tag >> 3, 3);
        assert_eq!(stream.read_string().unwrap(), "a");

        assert!(stream.eof().unwrap());
    }

    #[test]
    fn test_encode_missing_field() {
        let schema = arrival_schema();
        let record = Record::new("ArrivalEvent")
            .field("station_id", 41380)
            .field("direction", "a");

        let err = schema.encode(&record).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingField { field, .. } if field == "train_id"
        ));
    }

    #[test]
    fn test_encode_unknown_field() {
        let schema = arrival_schema();
        let record = Record::new("ArrivalEvent")
            .field("station_id", 41380)
            .field("train_id", "T1")
            .field("direction", "a")
            .field("dwell_time", 12i64);

        let err = schema.encode(&record).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownField { field, .. } if field == "dwell_time"
        ));
    }

    #[test]
    fn test_encode_type_mismatch() {
        let schema = arrival_schema();
        let record = Record::new("ArrivalEvent")
            .field("station_id", "41380")
            .field("train_id", "T1")
            .field("direction", "a");

        let err = schema.encode(&record).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeMismatch { field, .. } if field == "station_id"
        ));
    }

    #[test]
    fn test_encode_message_mismatch() {
        let schema = arrival_schema();
        let record = Record::new("TurnstileEvent").field("station_id", 41380);

        let err = schema.encode(&record).unwrap_err();
        assert!(matches!(err, SchemaError::MessageMismatch { .. }));
    }
}
