//! Error types for the entity type registry.

use thiserror::Error;
use wb_diff::DiffError;
use wb_serialization::SerializationError;

/// Errors that can occur while registering types or dispatching by type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No definition is registered for this entity type.
    #[error("unregistered entity type: {entity_type}")]
    UnregisteredType { entity_type: String },

    /// A definition for this entity type was already registered.
    #[error("entity type already registered: {entity_type}")]
    DuplicateType { entity_type: String },

    /// No registered id pattern matches the serialization.
    #[error("not a valid entity id: {serialization:?}")]
    InvalidId { serialization: String },

    /// Two entities of different types were passed where one type is required.
    #[error("entity type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Convenience alias for registry results.
pub type Result<T> = std::result::Result<T, RegistryError>;
