//! Error types for the entity model.

use thiserror::Error;
use wb_types::TypeError;

/// Errors that can occur while building or mutating entities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A term, alias or id failed validation.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// An entity or id of the wrong type was passed to a type-specific operation.
    #[error("entity type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A sitelink for this site already exists.
    #[error("duplicate sitelink for site {site_id}")]
    DuplicateSiteLink { site_id: String },

    /// The site id or page name of a sitelink is empty.
    #[error("invalid sitelink for site {site_id:?}: {reason}")]
    InvalidSiteLink { site_id: String, reason: String },
}

impl ModelError {
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Convenience alias for model results.
pub type Result<T> = std::result::Result<T, ModelError>;
