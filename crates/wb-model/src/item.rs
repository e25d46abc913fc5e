use std::any::Any;

use wb_types::{entity_type, EntityId, Fingerprint, ItemId};

use crate::entity::EntityDocument;
use crate::error::Result;
use crate::sitelink::SiteLinkList;
use crate::statement::StatementList;

/// The main entity type: terms, statements and sitelinks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Item {
    id: Option<ItemId>,
    pub fingerprint: Fingerprint,
    pub statements: StatementList,
    pub sitelinks: SiteLinkList,
}

impl Item {
    pub fn new(id: Option<ItemId>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.id
    }
}

impl EntityDocument for Item {
    fn entity_type(&self) -> &'static str {
        entity_type::ITEM
    }

    fn id(&self) -> Option<EntityId> {
        self.id.map(EntityId::from)
    }

    fn set_id(&mut self, id: EntityId) -> Result<()> {
        self.id = Some(ItemId::try_from(&id)?);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.fingerprint.is_empty() && self.statements.is_empty() && self.sitelinks.is_empty()
    }

    fn equals(&self, other: &dyn EntityDocument) -> bool {
        other.as_any().downcast_ref::<Item>().is_some_and(|o| {
            self.fingerprint == o.fingerprint
                && self.statements == o.statements
                && self.sitelinks == o.sitelinks
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

    fn sitelinks(&self) -> Option<&SiteLinkList> {
        Some(&self.sitelinks)
    }

    fn sitelinks_mut(&mut self) -> Option<&mut SiteLinkList> {
        Some(&mut self.sitelinks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::sitelink::SiteLink;
    use wb_types::TypeError;

    #[test]
    fn set_id_checks_type() {
        let mut item = Item::default();
        item.set_id(EntityId::new("item", "Q42")).unwrap();
        assert_eq!(item.item_id(), Some(ItemId::new(42).unwrap()));

        let err = item.set_id(EntityId::new("property", "P1")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Type(TypeError::TypeMismatch { .. })
        ));

        let err = item.set_id(EntityId::new("item", "X1")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Type(TypeError::InvalidEntityId { .. })
        ));
    }

    #[test]
    fn emptiness_covers_all_capabilities() {
        let mut item = Item::new(Some(ItemId::new(1).unwrap()));
        assert!(item.is_empty());
        item.sitelinks
            .set(SiteLink::new("enwiki", "Cat", []).unwrap());
        assert!(!item.is_empty());
    }

    #[test]
    fn equality_ignores_id() {
        let mut a = Item::new(Some(ItemId::new(1).unwrap()));
        let mut b = Item::new(Some(ItemId::new(2).unwrap()));
        a.fingerprint.set_label("en", "cat").unwrap();
        b.fingerprint.set_label("en", "cat").unwrap();
        assert!(a.equals(&b));

        b.fingerprint.set_label("en", "dog").unwrap();
        assert!(!a.equals(&b));
    }
}
