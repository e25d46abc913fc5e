use wb_model::{EntityDocument, Item};
use wb_types::entity_type;

use crate::diff::Diff;
use crate::error::{DiffError, DiffResult};
use crate::fingerprint::{diff_fingerprint, patch_fingerprint, ALIASES, DESCRIPTION, LABEL};
use crate::ops::PatchMode;
use crate::sitelinks::{diff_sitelinks, patch_sitelinks, SITELINK};
use crate::statements::{diff_statements, patch_statements, CLAIM};
use crate::strategy::{
    expect, expect_assoc, expect_mut, EntityDifferStrategy, EntityPatcherStrategy,
};

/// Differ for items: terms, statements and sitelinks.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemDiffer;

impl ItemDiffer {
    fn diff_items(&self, from: &Item, to: &Item) -> DiffResult<Diff> {
        let mut diff = Diff::new();
        diff_fingerprint(&from.fingerprint, &to.fingerprint, &mut diff);
        if let Some(op) = diff_statements(&from.statements, &to.statements)? {
            diff.insert(CLAIM, op);
        }
        if let Some(op) = diff_sitelinks(&from.sitelinks, &to.sitelinks) {
            diff.insert(SITELINK, op);
        }
        Ok(diff)
    }
}

impl EntityDifferStrategy for ItemDiffer {
    fn can_diff(&self, entity_type: &str) -> bool {
        entity_type == entity_type::ITEM
    }

    fn diff(&self, from: &dyn EntityDocument, to: &dyn EntityDocument) -> DiffResult<Diff> {
        self.diff_items(
            expect::<Item>(from, entity_type::ITEM)?,
            expect::<Item>(to, entity_type::ITEM)?,
        )
    }

    fn construction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        self.diff_items(&Item::default(), expect(entity, entity_type::ITEM)?)
    }

    fn destruction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        self.diff_items(expect(entity, entity_type::ITEM)?, &Item::default())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ItemPatcher;

impl EntityPatcherStrategy for ItemPatcher {
    fn can_patch(&self, entity_type: &str) -> bool {
        entity_type == entity_type::ITEM
    }

    fn patch(&self, entity: &mut dyn EntityDocument, diff: &Diff, mode: PatchMode) -> DiffResult<()> {
        let item = expect_mut::<Item>(entity, entity_type::ITEM)?;
        expect_assoc(diff)?;
        for (key, op) in diff.entries() {
            match key {
                LABEL | DESCRIPTION | ALIASES => {
                    patch_fingerprint(&mut item.fingerprint, key, op, mode)?
                }
                CLAIM => patch_statements(&mut item.statements, op, mode)?,
                SITELINK => patch_sitelinks(&mut item.sitelinks, op, mode)?,
                other => return Err(DiffError::unsupported(other)),
            }
        }
        Ok(())
    }
}
