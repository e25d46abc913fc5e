use wb_model::EntityDocument;

use crate::diff::Diff;
use crate::error::{DiffError, DiffResult};
use crate::ops::PatchMode;

/// Computes diffs between entities of the types it supports.
///
/// Implementations compare field by field and emit only changed fields.
/// `construction_diff(e)` equals `diff(empty, e)` and `destruction_diff(e)`
/// equals `diff(e, empty)` for the empty entity of `e`'s type.
pub trait EntityDifferStrategy: Send + Sync {
    fn can_diff(&self, entity_type: &str) -> bool;

    fn diff(&self, from: &dyn EntityDocument, to: &dyn EntityDocument) -> DiffResult<Diff>;

    fn construction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff>;

    fn destruction_diff(&self, entity: &dyn EntityDocument) -> DiffResult<Diff>;
}

/// Applies diffs produced by the matching [`EntityDifferStrategy`].
///
/// `patch` mutates in place and may leave the entity partially patched on
/// error; callers that need all-or-nothing semantics patch a copy.
pub trait EntityPatcherStrategy: Send + Sync {
    fn can_patch(&self, entity_type: &str) -> bool;

    fn patch(&self, entity: &mut dyn EntityDocument, diff: &Diff, mode: PatchMode)
        -> DiffResult<()>;
}

pub(crate) fn expect<'a, T: EntityDocument>(
    entity: &'a dyn EntityDocument,
    expected: &str,
) -> DiffResult<&'a T> {
    entity
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| DiffError::TypeMismatch {
            expected: expected.to_string(),
            actual: entity.entity_type().to_string(),
        })
}

pub(crate) fn expect_mut<'a, T: EntityDocument>(
    entity: &'a mut dyn EntityDocument,
    expected: &str,
) -> DiffResult<&'a mut T> {
    let actual = entity.entity_type();
    entity
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or_else(|| DiffError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
}

/// Fail unless the top level of an entity diff is keyed.
pub(crate) fn expect_assoc(diff: &Diff) -> DiffResult<()> {
    if diff.is_assoc() || diff.is_empty() {
        Ok(())
    } else {
        Err(DiffError::malformed("", "entity diffs are keyed"))
    }
}
