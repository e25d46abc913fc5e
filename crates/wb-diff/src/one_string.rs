use serde_json::Value;
use wb_model::{EntityDocument, OneString};
use wb_types::entity_type;

use crate::diff::Diff;
use crate::error::{DiffError, DiffResult};
use crate::fingerprint::{diff_fingerprint, patch_fingerprint, ALIASES, DESCRIPTION, LABEL};
use crate::ops::{apply_field, diff_strings, PatchMode};
use crate::strategy::{
    expect, expect_assoc, expect_mut, EntityDifferStrategy, EntityPatcherStrategy,
};

pub const CONTENT: &str = "content";

/// Differ for one-string entities: `content` plus terms.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneStringDiffer;

impl OneStringDiffer {
    fn diff_documents(&self, from: &OneString, to: &OneString) -> Diff {
        let mut diff = Diff::new();
        if let Some(op) = diff_strings(&from.content, &to.content) {
            diff.insert(CONTENT, op);
        }
        diff_fingerprint(&from.fingerprint, &to.fingerprint, &mut diff);
        diff
    }
}

impl EntityDifferStrategy for OneStringDiffer {
    fn can_diff(&self, entity_type: &str) -> bool {
        entity_type == entity_type::ONE_STRING
    }

    fn diff(&self, from: &dyn EntityDocument, to: &dyn EntityDocument) -> DiffResult<Diff> {
        Ok(self.diff_documents(
            expect::<OneString>(from, entity_type::ONE_STRING)?,
            expect::<OneString>(to, entity_type::ONE_STRING)?,
        ))
    }

    fn construction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        Ok(self.diff_documents(&OneString::default(), expect(entity, entity_type::ONE_STRING)?))
    }

    /// A `Remove` for the content and for every term.
    fn destruction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        Ok(self.diff_documents(expect(entity, entity_type::ONE_STRING)?, &OneString::default()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OneStringPatcher;

impl EntityPatcherStrategy for OneStringPatcher {
    fn can_patch(&self, entity_type: &str) -> bool {
        entity_type == entity_type::ONE_STRING
    }

    fn patch(&self, entity: &mut dyn EntityDocument, diff: &Diff, mode: PatchMode) -> DiffResult<()> {
        let doc = expect_mut::<OneString>(entity, entity_type::ONE_STRING)?;
        expect_assoc(diff)?;
        for (key, op) in diff.entries() {
            match key {
                CONTENT => {
                    let current = Value::String(doc.content.clone());
                    doc.content = match apply_field(Some(&current), op, mode, CONTENT)? {
                        Some(Value::String(s)) => s,
                        Some(_) => return Err(DiffError::malformed(CONTENT, "not a string")),
                        None => String::new(),
                    };
                }
                LABEL | DESCRIPTION | ALIASES => {
                    patch_fingerprint(&mut doc.fingerprint, key, op, mode)?
                }
                other => return Err(DiffError::unsupported(other)),
            }
        }
        Ok(())
    }
}
