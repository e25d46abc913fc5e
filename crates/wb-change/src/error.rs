//! Error types for change records.

use thiserror::Error;
use wb_registry::RegistryError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangeError {
    #[error("unknown change type: {0}")]
    UnknownChangeType(String),

    /// A timestamp that is not in `YYYYMMDDHHMMSS` form.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A change needs at least one entity snapshot.
    #[error("no entity given for the change")]
    NoEntity,

    #[error("entity has no id")]
    MissingEntityId,

    #[error("unsupported compact diff format version {0}")]
    UnsupportedFormatVersion(u32),

    #[error("change serialization error: {0}")]
    Serialization(String),

    #[error("change store error: {0}")]
    Storage(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<serde_json::Error> for ChangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience alias for change results.
pub type Result<T> = std::result::Result<T, ChangeError>;
