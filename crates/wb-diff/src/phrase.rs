use serde_json::Value;
use wb_model::{EntityDocument, PhraseDocument};
use wb_types::entity_type;

use crate::diff::{Diff, DiffOp};
use crate::error::{DiffError, DiffResult};
use crate::ops::{apply_field, PatchMode};
use crate::strategy::{
    expect, expect_assoc, expect_mut, EntityDifferStrategy, EntityPatcherStrategy,
};

pub const LANGUAGE: &str = "language";
pub const PHRASE: &str = "phrase";

/// Differ for phrase documents.
///
/// Creating or emptying a phrase adds or removes both `language` and
/// `phrase`. Otherwise each field that differs is a `Change`. Emptying into a
/// non-default language changes the language instead of removing it, since a
/// removed language falls back to [`wb_model::DEFAULT_LANGUAGE`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PhraseDiffer;

impl PhraseDiffer {
    fn diff_documents(&self, from: &PhraseDocument, to: &PhraseDocument) -> Diff {
        let mut diff = Diff::new();
        match (from.is_empty(), to.is_empty()) {
            (true, false) => {
                diff.insert(LANGUAGE, DiffOp::Add(to.language().into()));
                diff.insert(PHRASE, DiffOp::Add(to.phrase.as_str().into()));
            }
            (false, true) => {
                let op = if to.language() == wb_model::DEFAULT_LANGUAGE {
                    DiffOp::Remove(from.language().into())
                } else {
                    DiffOp::change(from.language(), to.language())
                };
                diff.insert(LANGUAGE, op);
                diff.insert(PHRASE, DiffOp::Remove(from.phrase.as_str().into()));
            }
            _ => {
                if from.language() != to.language() {
                    diff.insert(LANGUAGE, DiffOp::change(from.language(), to.language()));
                }
                if from.phrase != to.phrase {
                    diff.insert(PHRASE, DiffOp::change(from.phrase.as_str(), to.phrase.as_str()));
                }
            }
        }
        diff
    }
}

impl EntityDifferStrategy for PhraseDiffer {
    fn can_diff(&self, entity_type: &str) -> bool {
        entity_type == entity_type::PHRASE
    }

    fn diff(&self, from: &dyn EntityDocument, to: &dyn EntityDocument) -> DiffResult<Diff> {
        Ok(self.diff_documents(
            expect::<PhraseDocument>(from, entity_type::PHRASE)?,
            expect::<PhraseDocument>(to, entity_type::PHRASE)?,
        ))
    }

    fn construction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        Ok(self.diff_documents(&PhraseDocument::default(), expect(entity, entity_type::PHRASE)?))
    }

    fn destruction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff> {
        Ok(self.diff_documents(expect(entity, entity_type::PHRASE)?, &PhraseDocument::default()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PhrasePatcher;

fn as_string(value: Value, path: &str) -> DiffResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(DiffError::malformed(path, "not a string")),
    }
}

impl EntityPatcherStrategy for PhrasePatcher {
    fn can_patch(&self, entity_type: &str) -> bool {
        entity_type == entity_type::PHRASE
    }

    fn patch(&self, entity: &mut dyn EntityDocument, diff: &Diff, mode: PatchMode) -> DiffResult<()> {
        let doc = expect_mut::<PhraseDocument>(entity, entity_type::PHRASE)?;
        expect_assoc(diff)?;

        // The language of an empty phrase is a placeholder that an `Add` may
        // replace without conflict.
        let was_empty = doc.is_empty();

        for (key, op) in diff.entries() {
            match key {
                LANGUAGE => {
                    let current = Value::String(doc.language().to_string());
                    let current = match op {
                        DiffOp::Add(_) if was_empty => None,
                        _ => Some(&current),
                    };
                    match apply_field(current, op, mode, LANGUAGE)? {
                        Some(value) => doc.set_language(&as_string(value, LANGUAGE)?)?,
                        None => doc.set_language(wb_model::DEFAULT_LANGUAGE)?,
                    }
                }
                PHRASE => {
                    let current = Value::String(doc.phrase.clone());
                    doc.phrase = match apply_field(Some(&current), op, mode, PHRASE)? {
                        Some(value) => as_string(value, PHRASE)?,
                        None => String::new(),
                    };
                }
                other => return Err(DiffError::unsupported(other)),
            }
        }
        Ok(())
    }
}
