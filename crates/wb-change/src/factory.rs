//! Building changes from entity snapshots.

use std::sync::Arc;

use tracing::debug;
use wb_model::EntityDocument;
use wb_registry::{EntityDiffer, EntityTypeRegistry};

use crate::change::{ChangeType, EntityChange};
use crate::error::{ChangeError, Result};

/// Creates [`EntityChange`]s by diffing old and new snapshots.
#[derive(Debug, Clone)]
pub struct EntityChangeFactory {
    differ: EntityDiffer,
}

impl EntityChangeFactory {
    pub fn new(registry: Arc<EntityTypeRegistry>) -> Self {
        Self {
            differ: EntityDiffer::new(registry),
        }
    }

    /// A change for an edit from `old` to `new`: `add` without an old
    /// snapshot, `remove` without a new one, `update` otherwise.
    pub fn new_for_entity_change(
        &self,
        old: Option<&dyn EntityDocument>,
        new: Option<&dyn EntityDocument>,
    ) -> Result<EntityChange> {
        let (change_type, entity, diff) = match (old, new) {
            (None, None) => return Err(ChangeError::NoEntity),
            (None, Some(new)) => (ChangeType::Add, new, self.differ.construction_diff(new)?),
            (Some(old), None) => (ChangeType::Remove, old, self.differ.destruction_diff(old)?),
            (Some(old), Some(new)) => {
                (ChangeType::Update, new, self.differ.diff_entities(old, new)?)
            }
        };
        self.build(change_type, entity, diff)
    }

    /// A change for an undeleted entity.
    pub fn new_for_restore(&self, entity: &dyn EntityDocument) -> Result<EntityChange> {
        let diff = self.differ.construction_diff(entity)?;
        self.build(ChangeType::Restore, entity, diff)
    }

    fn build(
        &self,
        change_type: ChangeType,
        entity: &dyn EntityDocument,
        diff: wb_diff::Diff,
    ) -> Result<EntityChange> {
        let entity_id = entity.id().ok_or(ChangeError::MissingEntityId)?;
        let change = EntityChange::new_from_diff(change_type, entity_id, diff);
        debug!(
            entity = %change.entity_id(),
            change_type = %change_type,
            ops = change.diff().count(),
            "created entity change"
        );
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wb_model::Item;
    use wb_registry::RegistryError;
    use wb_types::ItemId;

    fn factory() -> EntityChangeFactory {
        EntityChangeFactory::new(Arc::new(EntityTypeRegistry::with_builtin_types()))
    }

    fn cat() -> Item {
        let mut item = Item::new(Some(ItemId::new(1).unwrap()));
        item.fingerprint.set_label("en", "cat").unwrap();
        item
    }

    #[test]
    fn picks_change_type_from_snapshots() {
        let factory = factory();
        let old = cat();
        let mut new = cat();
        new.fingerprint.set_description("en", "animal").unwrap();

        let add = factory.new_for_entity_change(None, Some(&new)).unwrap();
        assert_eq!(add.change_type(), ChangeType::Add);
        assert_eq!(add.aspects().label_changes, ["en"]);

        let remove = factory.new_for_entity_change(Some(&old), None).unwrap();
        assert_eq!(remove.change_type(), ChangeType::Remove);

        let update = factory.new_for_entity_change(Some(&old), Some(&new)).unwrap();
        assert_eq!(update.change_type(), ChangeType::Update);
        assert_eq!(update.type_string(), "wikibase-item~update");
        assert!(update.aspects().label_changes.is_empty());
        assert_eq!(update.aspects().description_changes, ["en"]);
        assert_eq!(update.entity_id().serialization(), "Q1");
    }

    #[test]
    fn restore_is_a_construction() {
        let change = factory().new_for_restore(&cat()).unwrap();
        assert_eq!(change.change_type(), ChangeType::Restore);
        assert_eq!(change.diff().count(), 1);
    }

    #[test]
    fn needs_an_identified_entity() {
        let factory = factory();
        assert_eq!(
            factory.new_for_entity_change(None, None).unwrap_err(),
            ChangeError::NoEntity
        );
        assert_eq!(
            factory
                .new_for_entity_change(None, Some(&Item::default()))
                .unwrap_err(),
            ChangeError::MissingEntityId
        );
    }

    #[test]
    fn type_mismatch_surfaces_from_registry() {
        let err = factory()
            .new_for_entity_change(Some(&cat()), Some(&wb_model::PhraseDocument::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            ChangeError::Registry(RegistryError::TypeMismatch { .. })
        ));
    }
}
