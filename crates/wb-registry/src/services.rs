//! Type-dispatching diff and patch services.

use std::sync::Arc;

use tracing::debug;
use wb_diff::{Diff, PatchMode};
use wb_model::EntityDocument;

use crate::error::{RegistryError, Result};
use crate::registry::EntityTypeRegistry;

/// Computes diffs between entities of any registered type.
#[derive(Debug, Clone)]
pub struct EntityDiffer {
    registry: Arc<EntityTypeRegistry>,
}

impl EntityDiffer {
    pub fn new(registry: Arc<EntityTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Diff two entities of the same type.
    pub fn diff_entities(
        &self,
        from: &dyn EntityDocument,
        to: &dyn EntityDocument,
    ) -> Result<Diff> {
        if from.entity_type() != to.entity_type() {
            return Err(RegistryError::TypeMismatch {
                expected: from.entity_type().to_string(),
                actual: to.entity_type().to_string(),
            });
        }
        let diff = self.registry.get_differ(from.entity_type())?.diff(from, to)?;
        debug!(
            entity_type = from.entity_type(),
            ops = diff.count(),
            "computed entity diff"
        );
        Ok(diff)
    }

    /// The diff that creates `entity` from the empty entity of its type.
    pub fn construction_diff(&self, entity: &dyn EntityDocument) -> Result<Diff> {
        let diff = self
            .registry
            .get_differ(entity.entity_type())?
            .construction_diff(entity)?;
        debug!(
            entity_type = entity.entity_type(),
            ops = diff.count(),
            "computed construction diff"
        );
        Ok(diff)
    }

    /// The diff that reduces `entity` to the empty entity of its type.
    pub fn destruction_diff(&self, entity: &dyn EntityDocument) -> Result<Diff> {
        let diff = self
            .registry
            .get_differ(entity.entity_type())?
            .destruction_diff(entity)?;
        debug!(
            entity_type = entity.entity_type(),
            ops = diff.count(),
            "computed destruction diff"
        );
        Ok(diff)
    }
}

/// Applies diffs to entities of any registered type.
#[derive(Debug, Clone)]
pub struct EntityPatcher {
    registry: Arc<EntityTypeRegistry>,
}

impl EntityPatcher {
    pub fn new(registry: Arc<EntityTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Patch a copy of `entity` and return it. The input is left untouched,
    /// also when patching fails.
    pub fn apply(
        &self,
        entity: &dyn EntityDocument,
        diff: &Diff,
        mode: PatchMode,
    ) -> Result<Box<dyn EntityDocument>> {
        let patcher = self.registry.get_patcher(entity.entity_type())?;
        let mut patched = entity.copy();
        patcher.patch(patched.as_mut(), diff, mode)?;
        debug!(
            entity_type = entity.entity_type(),
            ops = diff.count(),
            ?mode,
            "applied entity diff"
        );
        Ok(patched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wb_diff::{DiffError, DiffOp};
    use wb_model::{DataValue, Item, PhraseDocument, Snak, Statement};
    use wb_types::PropertyId;

    fn services() -> (EntityDiffer, EntityPatcher) {
        let registry = Arc::new(EntityTypeRegistry::with_builtin_types());
        (EntityDiffer::new(registry.clone()), EntityPatcher::new(registry))
    }

    #[test]
    fn label_added_to_empty_item() {
        let (differ, patcher) = services();
        let from = Item::default();
        let mut to = Item::default();
        to.fingerprint.set_label("en", "cat").unwrap();

        let diff = differ.diff_entities(&from, &to).unwrap();
        assert_eq!(
            serde_json::to_value(&diff).unwrap(),
            json!({
                "label": {
                    "type": "diff",
                    "isassoc": true,
                    "operations": {"en": {"type": "add", "newvalue": "cat"}}
                }
            })
        );

        let patched = patcher.apply(&from, &diff, PatchMode::Strict).unwrap();
        assert!(patched.equals(&to));
        assert!(from.is_empty());
    }

    #[test]
    fn mixed_types_are_rejected() {
        let (differ, _) = services();
        let err = differ
            .diff_entities(&Item::default(), &PhraseDocument::default())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::TypeMismatch {
                expected: "item".into(),
                actual: "phrase".into()
            }
        );
    }

    #[test]
    fn failed_patch_leaves_input_untouched() {
        let (_, patcher) = services();
        let mut item = Item::default();
        item.fingerprint.set_label("en", "dog").unwrap();

        let mut labels = Diff::new();
        labels.insert("de", DiffOp::Add(json!("Hund")));
        labels.insert("en", DiffOp::Add(json!("cat")));
        let mut diff = Diff::new();
        diff.insert("label", DiffOp::Diff(labels));

        let err = patcher.apply(&item, &diff, PatchMode::Strict).unwrap_err();
        assert!(matches!(err, RegistryError::Diff(DiffError::Conflict { .. })));
        assert!(item.fingerprint.label("de").is_none());

        let forced = patcher.apply(&item, &diff, PatchMode::Force).unwrap();
        let fingerprint = forced.fingerprint().unwrap();
        assert_eq!(fingerprint.labels().text("en"), Some("cat"));
        assert_eq!(fingerprint.labels().text("de"), Some("Hund"));
    }

    #[test]
    fn construction_and_destruction_are_inverse() {
        let (differ, patcher) = services();
        let mut item = Item::default();
        item.fingerprint.set_description("en", "small cat").unwrap();

        let construction = differ.construction_diff(&item).unwrap();
        let built = patcher
            .apply(&Item::default(), &construction, PatchMode::Strict)
            .unwrap();
        assert!(built.equals(&item));

        let destruction = differ.destruction_diff(&item).unwrap();
        let destroyed = patcher.apply(&item, &destruction, PatchMode::Strict).unwrap();
        assert!(destroyed.is_empty());
    }

    #[test]
    fn force_patch_twice_keeps_one_unkeyed_statement() {
        let (differ, patcher) = services();
        let empty = Item::default();
        let mut with_statement = Item::default();
        with_statement.statements.add(Statement::new(Snak::Value {
            property: PropertyId::new(1).unwrap(),
            datavalue: DataValue::string("cat"),
        }));
        let diff = differ.diff_entities(&empty, &with_statement).unwrap();

        let once = patcher.apply(&empty, &diff, PatchMode::Force).unwrap();
        let twice = patcher.apply(once.as_ref(), &diff, PatchMode::Force).unwrap();
        assert!(once.equals(&with_statement));
        assert!(twice.equals(once.as_ref()));
    }
}
