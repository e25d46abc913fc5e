//! Error types for entity serialization.

use thiserror::Error;
use wb_model::ModelError;
use wb_types::TypeError;

/// Errors that can occur while converting entities to or from JSON.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// The JSON does not have the shape of a serialized entity.
    #[error("malformed entity JSON: {0}")]
    Json(String),

    /// The `type` field is missing or not a string.
    #[error("serialized entity has no entity type")]
    MissingType,

    /// The serialized or in-memory entity is of another type than expected.
    #[error("entity type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A statement is listed under a property other than its main snak's.
    #[error("statement listed under {key} has main snak property {actual}")]
    StatementProperty { key: String, actual: String },

    /// A term, id or sitelink inside the JSON failed validation.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<TypeError> for SerializationError {
    fn from(err: TypeError) -> Self {
        Self::Model(ModelError::Type(err))
    }
}

/// Convenience alias for serialization results.
pub type Result<T> = std::result::Result<T, SerializationError>;
