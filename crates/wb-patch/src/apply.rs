//! Operation-by-operation application of a validated JSON-Patch document.

use json_patch::PatchOperation;
use serde_json::Value;

use crate::error::{PatchError, Result};
use crate::request::validate_patch;

fn field<'a>(operation: &'a Value, name: &str) -> &'a str {
    operation[name].as_str().unwrap_or_default()
}

fn not_found(operation: &Value, field_name: &'static str) -> PatchError {
    PatchError::TargetNotFound {
        operation: operation.clone(),
        field: field_name,
        target: field(operation, field_name).to_string(),
    }
}

/// Apply one operation, translating failures into client-facing errors.
fn apply_operation(document: &mut Value, operation: &Value) -> Result<()> {
    // Unparseable pointers cannot address anything.
    let parsed: PatchOperation =
        serde_json::from_value(operation.clone()).map_err(|_| not_found(operation, "path"))?;

    json_patch::patch(document, &[parsed]).map_err(|_| {
        let op = field(operation, "op");
        let path = field(operation, "path");
        if matches!(op, "move" | "copy") && document.pointer(field(operation, "from")).is_none() {
            return not_found(operation, "from");
        }
        match (op, document.pointer(path)) {
            ("test", Some(actual)) => PatchError::TestFailed {
                operation: operation.clone(),
                actual_value: actual.clone(),
            },
            _ => not_found(operation, "path"),
        }
    })
}

/// Validate `patch` and apply it to a copy of `target`. The target itself is
/// never modified.
pub fn apply_patch(target: &Value, patch: &Value) -> Result<Value> {
    let operations = validate_patch(patch)?;
    let mut patched = target.clone();
    for operation in operations {
        apply_operation(&mut patched, operation)?;
    }
    Ok(patched)
}
