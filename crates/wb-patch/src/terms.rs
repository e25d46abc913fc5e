//! Patching of label and description lists, and the checks every patched
//! term has to pass.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use wb_types::{is_valid_language_code, TermList};

use crate::apply::apply_patch;
use crate::error::{PatchError, Result, TermKind};

/// Default maximum length of a label or description, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 250;

/// Constraints on patched labels and descriptions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermRules {
    pub max_length: usize,
    /// When set, only these language codes are accepted.
    pub allowed_languages: Option<BTreeSet<String>>,
}

impl Default for TermRules {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            allowed_languages: None,
        }
    }
}

impl TermRules {
    fn language_allowed(&self, language: &str) -> bool {
        is_valid_language_code(language)
            && self
                .allowed_languages
                .as_ref()
                .map_or(true, |allowed| allowed.contains(language))
    }

    /// Check one patched term and return its text.
    pub fn check<'a>(&self, kind: TermKind, language: &str, value: &'a Value) -> Result<&'a str> {
        if !self.language_allowed(language) {
            return Err(PatchError::InvalidLanguageCode {
                kind,
                language: language.to_string(),
            });
        }
        let invalid = || PatchError::InvalidTerm {
            kind,
            language: language.to_string(),
            value: value.clone(),
        };
        let text = value.as_str().ok_or_else(invalid)?;
        if text.trim().is_empty() {
            return Err(PatchError::EmptyTerm {
                kind,
                language: language.to_string(),
            });
        }
        if text.chars().any(char::is_control) {
            return Err(invalid());
        }
        if text.chars().count() > self.max_length {
            return Err(PatchError::TermTooLong {
                kind,
                language: language.to_string(),
                value: text.to_string(),
                limit: self.max_length,
            });
        }
        Ok(text)
    }
}

/// The `{language: text}` view of a term list that clients patch.
pub fn term_map(terms: &TermList) -> Value {
    Value::Object(
        terms
            .iter()
            .map(|t| (t.language().to_string(), Value::String(t.text().to_string())))
            .collect::<Map<String, Value>>(),
    )
}

/// Apply a JSON-Patch document to the `{language: text}` view of `terms` and
/// return the validated result.
pub fn patch_terms(
    terms: &TermList,
    kind: TermKind,
    patch: &Value,
    rules: &TermRules,
) -> Result<TermList> {
    let patched = apply_patch(&term_map(terms), patch)?;
    let Value::Object(map) = patched else {
        return Err(PatchError::InvalidTermList { kind });
    };

    let mut result = TermList::new();
    for (language, value) in &map {
        let text = rules.check(kind, language, value)?;
        result
            .set_term(language, text)
            .map_err(|_| PatchError::InvalidLanguageCode {
                kind,
                language: language.clone(),
            })?;
    }
    Ok(result)
}

/// [`patch_terms`] for labels.
pub fn patch_labels(labels: &TermList, patch: &Value, rules: &TermRules) -> Result<TermList> {
    patch_terms(labels, TermKind::Label, patch, rules)
}

/// [`patch_terms`] for descriptions.
pub fn patch_descriptions(
    descriptions: &TermList,
    patch: &Value,
    rules: &TermRules,
) -> Result<TermList> {
    patch_terms(descriptions, TermKind::Description, patch, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels() -> TermList {
        let mut labels = TermList::new();
        labels.set_term("en", "potato").unwrap();
        labels.set_term("de", "Kartoffel").unwrap();
        labels
    }

    fn replace_en(value: Value) -> Value {
        json!([{"op": "replace", "path": "/en", "value": value}])
    }

    #[test]
    fn patches_the_language_map() {
        let patch = json!([
            {"op": "replace", "path": "/en", "value": "Solanum tuberosum"},
            {"op": "remove", "path": "/de"},
            {"op": "add", "path": "/ar", "value": "بطاطا"}
        ]);
        let patched = patch_labels(&labels(), &patch, &TermRules::default()).unwrap();
        assert_eq!(patched.text("en"), Some("Solanum tuberosum"));
        assert_eq!(patched.text("ar"), Some("بطاطا"));
        assert_eq!(patched.text("de"), None);
    }

    #[test]
    fn failed_test_leaves_labels_untouched() {
        let original = labels();
        let patch = json!([{"op": "test", "path": "/en", "value": "pizza"}]);
        let err = patch_labels(&original, &patch, &TermRules::default()).unwrap_err();
        assert_eq!(err.code(), "patch-test-failed");
        assert_eq!(err.context()["actual-value"], json!("potato"));
        assert_eq!(original, labels());
    }

    #[test]
    fn invalid_label() {
        let err = patch_labels(
            &labels(),
            &replace_en(json!("tab characters \t not allowed")),
            &TermRules::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "patched-label-invalid");
        assert_eq!(
            err.context(),
            json!({"language": "en", "value": "tab characters \t not allowed"})
        );

        let err =
            patch_labels(&labels(), &replace_en(json!(42)), &TermRules::default()).unwrap_err();
        assert_eq!(err.code(), "patched-label-invalid");
    }

    #[test]
    fn empty_label() {
        let err =
            patch_labels(&labels(), &replace_en(json!("")), &TermRules::default()).unwrap_err();
        assert_eq!(err.code(), "patched-label-empty");
        assert_eq!(err.context(), json!({"language": "en"}));
    }

    #[test]
    fn label_too_long() {
        let too_long = "x".repeat(DEFAULT_MAX_LENGTH + 1);
        let err = patch_labels(&labels(), &replace_en(json!(too_long)), &TermRules::default())
            .unwrap_err();
        assert_eq!(err.code(), "patched-label-too-long");
        assert_eq!(
            err.context(),
            json!({"language": "en", "value": too_long, "character-limit": 250})
        );
    }

    #[test]
    fn invalid_language_code() {
        let patch = json!([{"op": "add", "path": "/invalid-language-code", "value": "potato"}]);
        let err = patch_labels(&labels(), &patch, &TermRules::default()).unwrap_err();
        assert_eq!(err.code(), "patched-labels-invalid-language-code");
        assert_eq!(err.context(), json!({"language": "invalid-language-code"}));
    }

    #[test]
    fn language_allowlist() {
        let rules = TermRules {
            allowed_languages: Some(["en".to_string()].into_iter().collect()),
            ..TermRules::default()
        };
        let patch = json!([{"op": "remove", "path": "/de"}]);
        assert!(patch_labels(&labels(), &patch, &rules).is_ok());

        let patch = json!([{"op": "add", "path": "/fr", "value": "pomme de terre"}]);
        let err = patch_descriptions(&TermList::new(), &patch, &rules).unwrap_err();
        assert_eq!(err.code(), "patched-descriptions-invalid-language-code");
    }

    #[test]
    fn replacing_the_whole_map_with_a_string() {
        let patch = json!([{"op": "replace", "path": "", "value": "nope"}]);
        let err = patch_labels(&labels(), &patch, &TermRules::default()).unwrap_err();
        assert_eq!(err.code(), "patched-labels-invalid");
    }
}
