//! Structural validation of a JSON-Patch request.
//!
//! Checks run in order and the first failure wins, so clients always get the
//! same error for the same request.

use serde_json::Value;

use crate::error::{PatchError, Result};

const OPERATIONS: [&str; 6] = ["add", "remove", "replace", "move", "copy", "test"];

fn check_string_field(operation: &Value, field: &'static str) -> Result<()> {
    match operation.get(field) {
        None => Err(PatchError::MissingField {
            operation: operation.clone(),
            field,
        }),
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(PatchError::InvalidFieldType {
            operation: operation.clone(),
            field,
        }),
    }
}

fn validate_operation(operation: &Value) -> Result<()> {
    if !operation.is_object() {
        return Err(PatchError::InvalidPatch);
    }

    check_string_field(operation, "op")?;
    let op = operation["op"].as_str().unwrap_or_default();
    if !OPERATIONS.contains(&op) {
        return Err(PatchError::InvalidOperation {
            operation: operation.clone(),
        });
    }

    check_string_field(operation, "path")?;

    match op {
        "add" | "replace" | "test" if operation.get("value").is_none() => {
            Err(PatchError::MissingField {
                operation: operation.clone(),
                field: "value",
            })
        }
        "move" | "copy" => check_string_field(operation, "from"),
        _ => Ok(()),
    }
}

/// Check that `patch` is a well-formed JSON-Patch document and return its
/// operations.
pub fn validate_patch(patch: &Value) -> Result<&[Value]> {
    let operations = patch.as_array().ok_or(PatchError::InvalidPatch)?;
    for operation in operations {
        validate_operation(operation)?;
    }
    Ok(operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code_of(patch: Value) -> &'static str {
        validate_patch(&patch).unwrap_err().code()
    }

    #[test]
    fn accepts_every_operation() {
        let patch = json!([
            {"op": "add", "path": "/en", "value": "cat"},
            {"op": "remove", "path": "/de"},
            {"op": "replace", "path": "/en", "value": "cats"},
            {"op": "move", "from": "/en", "path": "/fr"},
            {"op": "copy", "from": "/fr", "path": "/en"},
            {"op": "test", "path": "/en", "value": "cats"}
        ]);
        assert_eq!(validate_patch(&patch).unwrap().len(), 6);
        assert!(validate_patch(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_arrays_and_non_objects() {
        assert_eq!(code_of(json!({"foo": "not a patch"})), "invalid-patch");
        assert_eq!(code_of(json!(["add"])), "invalid-patch");
    }

    #[test]
    fn missing_fields() {
        let operation = json!({"path": "/a/b/c", "value": "test"});
        let err = validate_patch(&json!([operation.clone()])).unwrap_err();
        assert_eq!(err.code(), "missing-json-patch-field");
        assert_eq!(err.context(), json!({"operation": operation, "field": "op"}));

        let err = validate_patch(&json!([{"op": "remove"}])).unwrap_err();
        assert_eq!(err.context()["field"], json!("path"));

        let err = validate_patch(&json!([{"op": "add", "path": "/a"}])).unwrap_err();
        assert_eq!(err.context()["field"], json!("value"));

        let err = validate_patch(&json!([{"op": "move", "path": "/a"}])).unwrap_err();
        assert_eq!(err.context()["field"], json!("from"));
    }

    #[test]
    fn wrong_field_types() {
        let err = validate_patch(&json!([{"op": {"foo": ["bar"]}, "path": "/a", "value": 1}]))
            .unwrap_err();
        assert_eq!(err.code(), "invalid-patch-field-type");
        assert_eq!(err.context()["field"], json!("op"));

        let err = validate_patch(&json!([{"op": "add", "path": 42, "value": 1}])).unwrap_err();
        assert_eq!(err.context()["field"], json!("path"));

        let err = validate_patch(&json!([{"op": "copy", "from": [], "path": "/a"}])).unwrap_err();
        assert_eq!(err.code(), "invalid-patch-field-type");
        assert_eq!(err.context()["field"], json!("from"));
    }

    #[test]
    fn unknown_operation() {
        let err = validate_patch(&json!([{"op": "foobar", "path": "/a", "value": 1}])).unwrap_err();
        assert_eq!(err.code(), "invalid-patch-operation");
        assert!(err.to_string().contains("foobar"));
    }

    #[test]
    fn first_failure_wins() {
        let patch = json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "foobar", "path": "/b"},
            "not an object"
        ]);
        assert_eq!(code_of(patch), "invalid-patch-operation");
    }
}
