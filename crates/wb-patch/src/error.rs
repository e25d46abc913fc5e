//! Error types for the JSON-Patch pathway.
//!
//! Every variant maps to a stable machine-readable [`code`](PatchError::code)
//! and a JSON [`context`](PatchError::context), mirroring what REST clients
//! receive.

use std::fmt;

use serde_json::{json, Value};
use thiserror::Error;
use wb_registry::RegistryError;

/// The term family a patched-term error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermKind {
    Label,
    Description,
}

impl TermKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// The request is not an array of operation objects.
    #[error("the provided patch is not a valid JSON Patch document")]
    InvalidPatch,

    #[error("missing '{field}' in JSON patch operation {operation}")]
    MissingField {
        operation: Value,
        field: &'static str,
    },

    #[error("'{field}' in JSON patch operation {operation} has the wrong type")]
    InvalidFieldType {
        operation: Value,
        field: &'static str,
    },

    #[error("unknown operation in JSON patch operation {operation}")]
    InvalidOperation { operation: Value },

    #[error("target '{target}' of '{field}' not found on the resource")]
    TargetNotFound {
        operation: Value,
        field: &'static str,
        target: String,
    },

    #[error("test operation {operation} failed: actual value is {actual_value}")]
    TestFailed { operation: Value, actual_value: Value },

    #[error("patched {kind}s are not a map of language codes to strings")]
    InvalidTermList { kind: TermKind },

    #[error("changed {kind} for '{language}' is invalid: {value}")]
    InvalidTerm {
        kind: TermKind,
        language: String,
        value: Value,
    },

    #[error("changed {kind} for '{language}' cannot be empty")]
    EmptyTerm { kind: TermKind, language: String },

    #[error("changed {kind} for '{language}' must not be more than {limit} characters long")]
    TermTooLong {
        kind: TermKind,
        language: String,
        value: String,
        limit: usize,
    },

    #[error("not a valid language code in changed {kind}s: {language}")]
    InvalidLanguageCode { kind: TermKind, language: String },

    #[error("the patch changes the entity id")]
    EntityIdChanged,

    #[error("the patch changes the entity type")]
    EntityTypeChanged,

    /// The patched JSON no longer describes a valid entity.
    #[error("patched entity is invalid: {reason}")]
    InvalidEntity { reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl PatchError {
    /// The stable error code reported to clients.
    pub fn code(&self) -> &'static str {
        use TermKind::{Description, Label};
        match self {
            Self::InvalidPatch => "invalid-patch",
            Self::MissingField { .. } => "missing-json-patch-field",
            Self::InvalidFieldType { .. } => "invalid-patch-field-type",
            Self::InvalidOperation { .. } => "invalid-patch-operation",
            Self::TargetNotFound { .. } => "patch-target-not-found",
            Self::TestFailed { .. } => "patch-test-failed",
            Self::InvalidTermList { kind: Label } => "patched-labels-invalid",
            Self::InvalidTermList { kind: Description } => "patched-descriptions-invalid",
            Self::InvalidTerm { kind: Label, .. } => "patched-label-invalid",
            Self::InvalidTerm { kind: Description, .. } => "patched-description-invalid",
            Self::EmptyTerm { kind: Label, .. } => "patched-label-empty",
            Self::EmptyTerm { kind: Description, .. } => "patched-description-empty",
            Self::TermTooLong { kind: Label, .. } => "patched-label-too-long",
            Self::TermTooLong { kind: Description, .. } => "patched-description-too-long",
            Self::InvalidLanguageCode { kind: Label, .. } => "patched-labels-invalid-language-code",
            Self::InvalidLanguageCode { kind: Description, .. } => {
                "patched-descriptions-invalid-language-code"
            }
            Self::EntityIdChanged => "patched-entity-id-changed",
            Self::EntityTypeChanged => "patched-entity-type-changed",
            Self::InvalidEntity { .. } => "patched-entity-invalid",
            Self::Registry(_) => "unexpected-error",
        }
    }

    /// Structured details accompanying the code.
    pub fn context(&self) -> Value {
        match self {
            Self::MissingField { operation, field }
            | Self::InvalidFieldType { operation, field }
            | Self::TargetNotFound {
                operation, field, ..
            } => json!({ "operation": operation, "field": field }),
            Self::InvalidOperation { operation } => json!({ "operation": operation }),
            Self::TestFailed {
                operation,
                actual_value,
            } => json!({ "operation": operation, "actual-value": actual_value }),
            Self::InvalidTerm {
                language, value, ..
            } => json!({ "language": language, "value": value }),
            Self::EmptyTerm { language, .. } | Self::InvalidLanguageCode { language, .. } => {
                json!({ "language": language })
            }
            Self::TermTooLong {
                language,
                value,
                limit,
                ..
            } => json!({ "language": language, "value": value, "character-limit": limit }),
            _ => json!({}),
        }
    }
}

/// Convenience alias for patch results.
pub type Result<T> = std::result::Result<T, PatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_depend_on_term_kind() {
        let label = PatchError::EmptyTerm {
            kind: TermKind::Label,
            language: "en".into(),
        };
        let description = PatchError::EmptyTerm {
            kind: TermKind::Description,
            language: "en".into(),
        };
        assert_eq!(label.code(), "patched-label-empty");
        assert_eq!(description.code(), "patched-description-empty");
        assert_eq!(label.context(), json!({"language": "en"}));
    }

    #[test]
    fn too_long_message_names_the_limit() {
        let err = PatchError::TermTooLong {
            kind: TermKind::Label,
            language: "en".into(),
            value: "x".repeat(251),
            limit: 250,
        };
        assert_eq!(
            err.to_string(),
            "changed label for 'en' must not be more than 250 characters long"
        );
        assert_eq!(err.context()["character-limit"], json!(250));
    }
}
