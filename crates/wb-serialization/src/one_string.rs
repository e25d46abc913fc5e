use serde::{Deserialize, Serialize};
use serde_json::Value;
use wb_model::{downcast, EntityDocument, OneString};
use wb_types::{entity_type, OneStringId};

use crate::error::Result;
use crate::fields::TermFields;
use crate::traits::{expect_type, EntityDeserializer, EntitySerializer};

#[derive(Serialize, Deserialize)]
struct SerializedOneString {
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(flatten)]
    terms: TermFields,
}

/// JSON form of [`OneString`]: `{"type": "one-string", "id", "content", terms...}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneStringSerializer;

impl EntitySerializer for OneStringSerializer {
    fn serialize(&self, entity: &dyn EntityDocument) -> Result<Value> {
        let doc = downcast::<OneString>(entity, entity_type::ONE_STRING)?;
        let serialized = SerializedOneString {
            entity_type: entity_type::ONE_STRING.to_string(),
            id: doc.one_string_id().map(ToString::to_string),
            content: doc.content.clone(),
            terms: TermFields::from(&doc.fingerprint),
        };
        Ok(serde_json::to_value(serialized)?)
    }
}

impl EntityDeserializer for OneStringSerializer {
    fn deserialize(&self, value: &Value) -> Result<Box<dyn EntityDocument>> {
        expect_type(value, entity_type::ONE_STRING)?;
        let serialized: SerializedOneString = serde_json::from_value(value.clone())?;
        let id = serialized
            .id
            .map(|id| id.parse::<OneStringId>())
            .transpose()?;
        let mut doc = OneString::new(id, serialized.content);
        doc.fingerprint = serialized.terms.into();
        Ok(Box::new(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerializationError;
    use serde_json::json;

    #[test]
    fn round_trip() {
        let mut doc = OneString::new(Some(OneStringId::generate()), "hello world");
        doc.fingerprint.set_label("en", "greeting").unwrap();

        let value = OneStringSerializer.serialize(&doc).unwrap();
        assert_eq!(value["content"], "hello world");
        let back = OneStringSerializer.deserialize(&value).unwrap();
        assert!(back.equals(&doc));
        assert_eq!(back.id(), doc.id());
    }

    #[test]
    fn bad_id_is_a_model_error() {
        let err = OneStringSerializer
            .deserialize(&json!({"type": "one-string", "id": "0abc"}))
            .unwrap_err();
        assert!(matches!(err, SerializationError::Model(_)));
    }
}
