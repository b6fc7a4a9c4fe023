//! Error types for the transit-schema crate.

use thiserror::Error;

/// Errors raised while parsing schemas or validating records against them.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema parse error: {0}")]
    Parse(String),

    #[error("Message type not found in schema: {0}")]
    MessageNotFound(String),

    #[error("Unsupported field '{field}' in message '{message}': {reason}")]
    UnsupportedField {
        message: String,
        field: String,
        reason: String,
    },

    #[error("Record type '{actual}' does not match schema message '{expected}'")]
    MessageMismatch { expected: String, actual: String },

    #[error("Missing required field '{field}' for message '{message}'")]
    MissingField { message: String, field: String },

    #[error("Field '{field}' is not declared by message '{message}'")]
    UnknownField { message: String, field: String },

    #[error("Field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Protobuf encoding error: {0}")]
    Encode(String),
}

/// Result type alias for transit-schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
