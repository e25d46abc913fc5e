//! Error types for the diff crate.

use thiserror::Error;
use wb_model::ModelError;

/// Errors that can occur while computing or applying diffs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// An `Add` targets a field that already holds a different value.
    #[error("conflict at {path}: field already holds a different value")]
    Conflict { path: String },

    /// A `Remove` or `Change` does not match the current value.
    #[error("stale diff at {path}: current value does not match the recorded old value")]
    StaleDiff { path: String },

    /// The diff names a field this patcher does not know how to apply.
    #[error("unsupported field in diff: {path}")]
    UnsupportedField { path: String },

    /// A differ or patcher was given an entity of another type.
    #[error("entity type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The diff has the wrong shape at `path`, e.g. a list where a map is expected.
    #[error("malformed diff at {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// Applying the diff produced an invalid term, id or sitelink.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl DiffError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(path: impl Into<String>) -> Self {
        Self::UnsupportedField { path: path.into() }
    }
}

impl From<wb_types::TypeError> for DiffError {
    fn from(err: wb_types::TypeError) -> Self {
        Self::Model(ModelError::Type(err))
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
