use thiserror::Error;

/// Errors produced by term and identifier operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid language code {code:?}: {reason}")]
    InvalidLanguageCode { code: String, reason: String },

    #[error("no term for language {language:?}")]
    TermNotFound { language: String },

    #[error("invalid {entity_type} id: {serialization:?}")]
    InvalidEntityId {
        entity_type: String,
        serialization: String,
    },

    #[error("entity type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience type alias for term and identifier operations.
pub type Result<T> = std::result::Result<T, TypeError>;
