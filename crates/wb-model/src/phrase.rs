use std::any::Any;

use wb_types::{entity_type, validate_language_code, EntityId, PhraseId};

use crate::entity::EntityDocument;
use crate::error::Result;

pub const DEFAULT_LANGUAGE: &str = "en";

/// A custom entity type holding one phrase in one language. It has no
/// fingerprint, statements or sitelinks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseDocument {
    id: Option<PhraseId>,
    language: String,
    pub phrase: String,
}

impl Default for PhraseDocument {
    fn default() -> Self {
        Self {
            id: None,
            language: DEFAULT_LANGUAGE.to_string(),
            phrase: String::new(),
        }
    }
}

impl PhraseDocument {
    pub fn new(id: Option<PhraseId>, language: &str, phrase: impl Into<String>) -> Result<Self> {
        validate_language_code(language)?;
        Ok(Self {
            id,
            language: language.to_string(),
            phrase: phrase.into(),
        })
    }

    pub fn phrase_id(&self) -> Option<&PhraseId> {
        self.id.as_ref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        validate_language_code(language)?;
        self.language = language.to_string();
        Ok(())
    }
}

impl EntityDocument for PhraseDocument {
    fn entity_type(&self) -> &'static str {
        entity_type::PHRASE
    }

    fn id(&self) -> Option<EntityId> {
        self.id.as_ref().map(EntityId::from)
    }

    fn set_id(&mut self, id: EntityId) -> Result<()> {
        self.id = Some(PhraseId::try_from(&id)?);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.phrase.is_empty()
    }

    fn equals(&self, other: &dyn EntityDocument) -> bool {
        other
            .as_any()
            .downcast_ref::<PhraseDocument>()
            .is_some_and(|o| self.language == o.language && self.phrase == o.phrase)
    }

    fn copy(&self) -> Box<dyn EntityDocument> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_english() {
        let doc = PhraseDocument::default();
        assert_eq!(doc.language(), "en");
        assert!(doc.is_empty());
    }

    #[test]
    fn language_is_validated() {
        assert!(PhraseDocument::new(None, "EN", "hi").is_err());
        let mut doc = PhraseDocument::new(None, "de", "Hallo").unwrap();
        assert!(doc.set_language("not a code").is_err());
        assert_eq!(doc.language(), "de");
    }

    #[test]
    fn language_only_is_still_empty() {
        let doc = PhraseDocument::new(None, "fr", "").unwrap();
        assert!(doc.is_empty());
        assert!(!doc.equals(&PhraseDocument::default()));
    }
}
