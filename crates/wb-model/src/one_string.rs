use std::any::Any;

use wb_types::{entity_type, EntityId, Fingerprint, OneStringId};

use crate::entity::EntityDocument;
use crate::error::Result;

/// A custom entity type holding a single string plus terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OneString {
    id: Option<OneStringId>,
    pub content: String,
    pub fingerprint: Fingerprint,
}

impl OneString {
    pub fn new(id: Option<OneStringId>, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            fingerprint: Fingerprint::default(),
        }
    }

    pub fn one_string_id(&self) -> Option<&OneStringId> {
        self.id.as_ref()
    }
}

impl EntityDocument for OneString {
    fn entity_type(&self) -> &'static str {
        entity_type::ONE_STRING
    }

    fn id(&self) -> Option<EntityId> {
        self.id.as_ref().map(EntityId::from)
    }

    fn set_id(&mut self, id: EntityId) -> Result<()> {
        self.id = Some(OneStringId::try_from(&id)?);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.content.is_empty() && self.fingerprint.is_empty()
    }

    fn equals(&self, other: &dyn EntityDocument) -> bool {
        other
            .as_any()
            .downcast_ref::<OneString>()
            .is_some_and(|o| self.content == o.content && self.fingerprint == o.fingerprint)
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

    fn fingerprint(&self) -> Option<&Fingerprint> {
        Some(&self.fingerprint)
    }

    fn fingerprint_mut(&mut self) -> Option<&mut Fingerprint> {
        Some(&mut self.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_iff_no_content_and_no_terms() {
        let mut doc = OneString::default();
        assert!(doc.is_empty());
        doc.fingerprint.set_label("en", "greeting").unwrap();
        assert!(!doc.is_empty());
        assert!(!OneString::new(None, "hello").is_empty());
    }

    #[test]
    fn set_id_accepts_generated_ids() {
        let mut doc = OneString::default();
        let id = OneStringId::generate();
        doc.set_id(EntityId::from(&id)).unwrap();
        assert_eq!(doc.one_string_id(), Some(&id));
        assert!(doc.set_id(EntityId::new("item", "Q1")).is_err());
    }
}
