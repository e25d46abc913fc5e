use serde_json::Value;
use wb_model::{EntityDocument, Property};
use wb_types::entity_type;

use crate::diff::Diff;
use crate::error::{DiffError, DiffResult};
use crate::fingerprint::{diff_fingerprint, patch_fingerprint, ALIASES, DESCRIPTION, LABEL};
use crate::ops::{apply_field, diff_strings, PatchMode};
use crate::statements::{diff_statements, patch_statements, CLAIM};
use crate::strategy::{
    expect, expect_assoc, expect_mut, EntityDifferStrategy, EntityPatcherStrategy,
};

pub const DATATYPE: &str = "datatype";

/// Differ for properties: terms, statements and the data type.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyDiffer;

impl PropertyDiffer {
    fn diff_properties(&self, from: &Property, to: &Property) -> DiffResult<Diff> {
        let mut diff = Diff::new();
        diff_fingerprint(&from.fingerprint, &to.fingerprint, &mut diff);
        if let Some(op) = diff_statements(&from.statements, &to.statements)? {
            diff.insert(CLAIM, op);
        }
        if let Some(op) = diff_strings(&from.data_type, &to.data_type) {
            diff.insert(DATATYPE, op);
        }
        Ok(diff)
    }
}

impl EntityDifferStrategy for PropertyDiffer {
    fn can_diff(&self, entity_type: &str) -> bool {
        entity_type == entity_type::PROPERTY
    }

    fn diff(&self, from: &dyn EntityDocument, to: &dyn EntityDocument) -> DiffResult<Diff> {
        self.diff_properties(
            expect::<Property>(from, entity_type::PROPERTY)?,
            expect::<Property>(to, entity_type::PROPERTY)?,
        )
    }

    fn construction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        self.diff_properties(&Property::default(), expect(entity, entity_type::PROPERTY)?)
    }

    fn destruction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        self.diff_properties(expect(entity, entity_type::PROPERTY)?, &Property::default())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyPatcher;

impl EntityPatcherStrategy for PropertyPatcher {
    fn can_patch(&self, entity_type: &str) -> bool {
        entity_type == entity_type::PROPERTY
    }

    fn patch(&self, entity: &mut dyn EntityDocument, diff: &Diff, mode: PatchMode) -> DiffResult<()> {
        let property = expect_mut::<Property>(entity, entity_type::PROPERTY)?;
        expect_assoc(diff)?;
        for (key, op) in diff.entries() {
            match key {
                LABEL | DESCRIPTION | ALIASES => {
                    patch_fingerprint(&mut property.fingerprint, key, op, mode)?
                }
                CLAIM => patch_statements(&mut property.statements, op, mode)?,
                DATATYPE => {
                    let current = Value::String(property.data_type.clone());
                    property.data_type = match apply_field(Some(&current), op, mode, DATATYPE)? {
                        Some(Value::String(s)) => s,
                        Some(_) => return Err(DiffError::malformed(DATATYPE, "not a string")),
                        None => String::new(),
                    };
                }
                other => return Err(DiffError::unsupported(other)),
            }
        }
        Ok(())
    }
}
