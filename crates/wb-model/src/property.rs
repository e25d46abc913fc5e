use std::any::Any;

use wb_types::{entity_type, EntityId, Fingerprint, PropertyId};

use crate::entity::EntityDocument;
use crate::error::Result;
use crate::statement::StatementList;

/// A property: terms, statements and the data type of its values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Property {
    id: Option<PropertyId>,
    pub fingerprint: Fingerprint,
    pub statements: StatementList,
    pub data_type: String,
}

impl Property {
    pub fn new(id: Option<PropertyId>, data_type: impl Into<String>) -> Self {
        Self {
            id,
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    pub fn property_id(&self) -> Option<PropertyId> {
        self.id
    }
}

impl EntityDocument for Property {
    fn entity_type(&self) -> &'static str {
        entity_type::PROPERTY
    }

    fn id(&self) -> Option<EntityId> {
        self.id.map(EntityId::from)
    }

    fn set_id(&mut self, id: EntityId) -> Result<()> {
        self.id = Some(PropertyId::try_from(&id)?);
        Ok(())
    }

    /// The data type is not content: a property with only a data type is empty.
    fn is_empty(&self) -> bool {
        self.fingerprint.is_empty() && self.statements.is_empty()
    }

    fn equals(&self, other: &dyn EntityDocument) -> bool {
        other.as_any().downcast_ref::<Property>().is_some_and(|o| {
            self.data_type == o.data_type
                && self.fingerprint == o.fingerprint
                && self.statements == o.statements
        })
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

    fn statements(&self) -> Option<&StatementList> {
        Some(&self.statements)
    }

    fn statements_mut(&mut self) -> Option<&mut StatementList> {
        Some(&mut self.statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_alone_is_empty_but_compared() {
        let a = Property::new(None, "string");
        let b = Property::new(None, "wikibase-item");
        assert!(a.is_empty());
        assert!(!a.equals(&b));
        assert!(a.equals(&Property::new(PropertyId::new(5).ok(), "string")));
    }

    #[test]
    fn has_no_sitelinks() {
        assert!(Property::default().sitelinks().is_none());
    }
}
