//! JSON-Patch of whole serialized entities.

use serde_json::Value;
use tracing::{debug, warn};
use wb_model::EntityDocument;
use wb_registry::EntityTypeRegistry;

use crate::apply::apply_patch;
use crate::error::{PatchError, Result, TermKind};
use crate::terms::TermRules;

fn check_term_section(
    entity: &Value,
    section: &str,
    kind: TermKind,
    rules: &TermRules,
) -> Result<()> {
    let Some(terms) = entity.get(section) else {
        return Ok(());
    };
    let terms = terms
        .as_object()
        .ok_or(PatchError::InvalidTermList { kind })?;
    for (language, term) in terms {
        // Serialized terms are `{"language": .., "value": ..}` objects.
        let value = term.get("value").unwrap_or(term);
        rules.check(kind, language, value)?;
    }
    Ok(())
}

/// Apply a JSON-Patch document to the serialized form of `entity` and return
/// the resulting entity. The input entity is never modified.
///
/// Patches may not change `id` or `type`, and every patched label and
/// description must satisfy `rules`.
pub fn patch_entity(
    registry: &EntityTypeRegistry,
    entity: &dyn EntityDocument,
    patch: &Value,
    rules: &TermRules,
) -> Result<Box<dyn EntityDocument>> {
    let serialized = registry.serialize(entity)?;
    let patched = apply_patch(&serialized, patch)?;

    if patched.get("id") != serialized.get("id") {
        return Err(PatchError::EntityIdChanged);
    }
    if patched.get("type") != serialized.get("type") {
        return Err(PatchError::EntityTypeChanged);
    }
    check_term_section(&patched, "labels", TermKind::Label, rules)?;
    check_term_section(&patched, "descriptions", TermKind::Description, rules)?;

    let result = registry
        .deserialize(&patched)
        .map_err(|e| {
            warn!(entity_type = entity.entity_type(), error = %e, "patched entity does not deserialize");
            PatchError::InvalidEntity {
                reason: e.to_string(),
            }
        })?;
    debug!(
        entity_type = entity.entity_type(),
        operations = patch.as_array().map_or(0, Vec::len),
        "applied JSON patch to entity"
    );
    Ok(result)
}
