//! Terms (a text in one language) and per-language term lists.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TypeError};
use crate::language::validate_language_code;

/// A text in a single language.
///
/// Serializes as `{"language": "en", "value": "cat"}`. The text may be empty
/// while a term is being built, but [`TermList`] never stores an empty term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTerm")]
pub struct Term {
    language: String,
    #[serde(rename = "value")]
    text: String,
}

#[derive(Deserialize)]
struct RawTerm {
    language: String,
    value: String,
}

impl TryFrom<RawTerm> for Term {
    type Error = TypeError;

    fn try_from(raw: RawTerm) -> Result<Self> {
        Term::new(raw.language, raw.value)
    }
}

impl Term {
    /// Create a term, validating the language code.
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let language = language.into();
        validate_language_code(&language)?;
        Ok(Self {
            language,
            text: text.into(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.language, self.text)
    }
}

/// At most one [`Term`] per language.
///
/// Equality is order independent; iteration is sorted by language code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TermList {
    terms: BTreeMap<String, Term>,
}

impl TermList {
    /// Create an empty term list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from terms. Later terms replace earlier ones for the same
    /// language; empty terms are dropped.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut list = Self::new();
        for term in terms {
            list.set(term);
        }
        list
    }

    /// Insert or replace the term for `language`. An empty `text` removes the
    /// term (a no-op if there is none).
    pub fn set_term(&mut self, language: &str, text: &str) -> Result<()> {
        let term = Term::new(language, text)?;
        self.set(term);
        Ok(())
    }

    /// Insert or replace a term. An empty term removes the language instead.
    pub fn set(&mut self, term: Term) {
        if term.text.is_empty() {
            self.terms.remove(&term.language);
        } else {
            self.terms.insert(term.language.clone(), term);
        }
    }

    /// The term for `language`, failing with [`TypeError::TermNotFound`].
    pub fn get_by_language(&self, language: &str) -> Result<&Term> {
        self.terms
            .get(language)
            .ok_or_else(|| TypeError::TermNotFound {
                language: language.to_string(),
            })
    }

    pub fn get(&self, language: &str) -> Option<&Term> {
        self.terms.get(language)
    }

    /// The text for `language`, if present.
    pub fn text(&self, language: &str) -> Option<&str> {
        self.terms.get(language).map(Term::text)
    }

    pub fn has_term_for_language(&self, language: &str) -> bool {
        self.terms.contains_key(language)
    }

    /// Remove the term for `language`. Returns the removed term, if any.
    pub fn remove_by_language(&mut self, language: &str) -> Option<Term> {
        self.terms.remove(language)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in language-code order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    /// Language codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

impl FromIterator<Term> for TermList {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self::from_terms(iter)
    }
}

impl Serialize for TermList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len()))?;
        for (language, term) in &self.terms {
            map.serialize_entry(language, term)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TermList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, Term>::deserialize(deserializer)?;
        let mut list = TermList::new();
        for (key, term) in raw {
            if key != term.language {
                return Err(serde::de::Error::custom(format!(
                    "term keyed by {key:?} has language {:?}",
                    term.language
                )));
            }
            list.set(term);
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_get() {
        let mut list = TermList::new();
        list.set_term("en", "cat").unwrap();
        assert_eq!(list.get_by_language("en").unwrap().text(), "cat");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn set_replaces_existing_language() {
        let mut list = TermList::new();
        list.set_term("en", "cat").unwrap();
        list.set_term("en", "kitten").unwrap();
        assert_eq!(list.text("en"), Some("kitten"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn empty_text_removes_term() {
        let mut list = TermList::new();
        list.set_term("en", "cat").unwrap();
        list.set_term("en", "").unwrap();
        assert!(list.is_empty());

        // Removing an absent language is a no-op.
        list.set_term("de", "").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn missing_language_is_not_found() {
        let list = TermList::new();
        assert_eq!(
            list.get_by_language("fr"),
            Err(TypeError::TermNotFound {
                language: "fr".into()
            })
        );
    }

    #[test]
    fn invalid_language_rejected() {
        let mut list = TermList::new();
        assert!(list.set_term("", "cat").is_err());
        assert!(list.set_term("Not A Language", "cat").is_err());
        assert!(list.is_empty());
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = TermList::from_terms([
            Term::new("en", "cat").unwrap(),
            Term::new("de", "Katze").unwrap(),
        ]);
        let b = TermList::from_terms([
            Term::new("de", "Katze").unwrap(),
            Term::new("en", "cat").unwrap(),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_as_language_map() {
        let list = TermList::from_terms([Term::new("en", "cat").unwrap()]);
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value, json!({"en": {"language": "en", "value": "cat"}}));

        let parsed: TermList = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn deserialize_rejects_mismatched_key() {
        let value = json!({"de": {"language": "en", "value": "cat"}});
        assert!(serde_json::from_value::<TermList>(value).is_err());
    }

    #[test]
    fn deserialize_rejects_invalid_language() {
        let value = json!({"EN": {"language": "EN", "value": "cat"}});
        assert!(serde_json::from_value::<TermList>(value).is_err());
    }
}
