use serde_json::Value;
use wb_model::EntityDocument;

use crate::error::{Result, SerializationError};

/// Converts an entity of one type to its JSON form.
///
/// Implementations fail with a [`wb_model::ModelError::TypeMismatch`] when
/// given an entity of another type.
pub trait EntitySerializer: Send + Sync {
    fn serialize(&self, entity: &dyn EntityDocument) -> Result<Value>;
}

/// Builds an entity of one type from its JSON form.
///
/// Missing term, statement and sitelink sections are treated as empty. The
/// `type` field must name the deserializer's entity type.
pub trait EntityDeserializer: Send + Sync {
    fn deserialize(&self, value: &Value) -> Result<Box<dyn EntityDocument>>;
}

/// Read the `type` field of a serialized entity.
pub fn entity_type_of(value: &Value) -> Result<&str> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(SerializationError::MissingType)
}

/// Fail unless `value` is tagged with `expected`.
pub(crate) fn expect_type(value: &Value, expected: &str) -> Result<()> {
    let actual = entity_type_of(value)?;
    if actual == expected {
        Ok(())
    } else {
        Err(SerializationError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_type_tag() {
        assert_eq!(entity_type_of(&json!({"type": "item"})).unwrap(), "item");
        assert_eq!(
            entity_type_of(&json!({"type": 3})),
            Err(SerializationError::MissingType)
        );
        assert_eq!(
            entity_type_of(&json!([])),
            Err(SerializationError::MissingType)
        );
    }

    #[test]
    fn mismatched_type_reported() {
        let err = expect_type(&json!({"type": "phrase"}), "item").unwrap_err();
        assert_eq!(
            err,
            SerializationError::TypeMismatch {
                expected: "item".into(),
                actual: "phrase".into()
            }
        );
    }
}
