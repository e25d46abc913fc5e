use serde::{Deserialize, Serialize};
use serde_json::Value;
use wb_model::{downcast, EntityDocument, PhraseDocument, DEFAULT_LANGUAGE};
use wb_types::{entity_type, PhraseId};

use crate::error::Result;
use crate::traits::{expect_type, EntityDeserializer, EntitySerializer};

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Serialize, Deserialize)]
struct SerializedPhrase {
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    phrase: String,
}

/// JSON form of [`PhraseDocument`]: `{"type": "phrase", "id", "language", "phrase"}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhraseSerializer;

impl EntitySerializer for PhraseSerializer {
    fn serialize(&self, entity: &dyn EntityDocument) -> Result<Value> {
        let doc = downcast::<PhraseDocument>(entity, entity_type::PHRASE)?;
        let serialized = SerializedPhrase {
            entity_type: entity_type::PHRASE.to_string(),
            id: doc.phrase_id().map(ToString::to_string),
            language: doc.language().to_string(),
            phrase: doc.phrase.clone(),
        };
        Ok(serde_json::to_value(serialized)?)
    }
}

impl EntityDeserializer for PhraseSerializer {
    fn deserialize(&self, value: &Value) -> Result<Box<dyn EntityDocument>> {
        expect_type(value, entity_type::PHRASE)?;
        let serialized: SerializedPhrase = serde_json::from_value(value.clone())?;
        let id = serialized.id.map(|id| id.parse::<PhraseId>()).transpose()?;
        let doc = PhraseDocument::new(id, &serialized.language, serialized.phrase)?;
        Ok(Box::new(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip() {
        let doc = PhraseDocument::new("greeting".parse().ok(), "de", "Hallo").unwrap();
        let value = PhraseSerializer.serialize(&doc).unwrap();
        assert_eq!(
            value,
            json!({"type": "phrase", "id": "greeting", "language": "de", "phrase": "Hallo"})
        );
        let back = PhraseSerializer.deserialize(&value).unwrap();
        assert!(back.equals(&doc));
        assert_eq!(back.id(), doc.id());
    }

    #[test]
    fn language_defaults_to_english() {
        let back = PhraseSerializer
            .deserialize(&json!({"type": "phrase", "phrase": "hi"}))
            .unwrap();
        let expected = PhraseDocument::new(None, "en", "hi").unwrap();
        assert!(back.equals(&expected));
    }

    #[test]
    fn invalid_language_rejected() {
        assert!(PhraseSerializer
            .deserialize(&json!({"type": "phrase", "language": "Not Valid"}))
            .is_err());
    }
}
