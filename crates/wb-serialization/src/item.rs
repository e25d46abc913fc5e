use serde::{Deserialize, Serialize};
use serde_json::Value;
use wb_model::{downcast, EntityDocument, Item, SiteLinkList};
use wb_types::{entity_type, ItemId};

use crate::error::Result;
use crate::fields::{claims_of, statements_from, Claims, TermFields};
use crate::traits::{expect_type, EntityDeserializer, EntitySerializer};

#[derive(Serialize, Deserialize)]
struct SerializedItem {
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<ItemId>,
    #[serde(flatten)]
    terms: TermFields,
    #[serde(default)]
    claims: Claims,
    #[serde(default)]
    sitelinks: SiteLinkList,
}

/// JSON form of [`Item`]:
/// `{"type": "item", "id": "Q1", "labels", "descriptions", "aliases", "claims", "sitelinks"}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemSerializer;

impl EntitySerializer for ItemSerializer {
    fn serialize(&self, entity: &dyn EntityDocument) -> Result<Value> {
        let item = downcast::<Item>(entity, entity_type::ITEM)?;
        let serialized = SerializedItem {
            entity_type: entity_type::ITEM.to_string(),
            id: item.item_id(),
            terms: TermFields::from(&item.fingerprint),
            claims: claims_of(&item.statements),
            sitelinks: item.sitelinks.clone(),
        };
        Ok(serde_json::to_value(serialized)?)
    }
}

impl EntityDeserializer for ItemSerializer {
    fn deserialize(&self, value: &Value) -> Result<Box<dyn EntityDocument>> {
        expect_type(value, entity_type::ITEM)?;
        let serialized: SerializedItem = serde_json::from_value(value.clone())?;
        let mut item = Item::new(serialized.id);
        item.fingerprint = serialized.terms.into();
        item.statements = statements_from(serialized.claims)?;
        item.sitelinks = serialized.sitelinks;
        Ok(Box::new(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerializationError;
    use serde_json::json;
    use wb_model::{DataValue, PhraseDocument, SiteLink, Snak, Statement};
    use wb_types::PropertyId;

    fn sample_item() -> Item {
        let mut item = Item::new(ItemId::new(42).ok());
        item.fingerprint.set_label("en", "cat").unwrap();
        item.fingerprint.set_description("en", "small feline").unwrap();
        item.fingerprint.set_aliases("en", ["kitty"]).unwrap();
        item.statements.add(
            Statement::new(Snak::Value {
                property: PropertyId::new(31).unwrap(),
                datavalue: DataValue::string("mammal"),
            })
            .with_guid("Q42$1"),
        );
        item.sitelinks
            .set(SiteLink::new("enwiki", "Cat", [ItemId::new(17).unwrap()]).unwrap());
        item
    }

    #[test]
    fn serialized_shape() {
        let value = ItemSerializer.serialize(&sample_item()).unwrap();
        assert_eq!(value["type"], "item");
        assert_eq!(value["id"], "Q42");
        assert_eq!(value["labels"]["en"], json!({"language": "en", "value": "cat"}));
        assert_eq!(value["aliases"]["en"], json!(["kitty"]));
        assert_eq!(value["claims"]["P31"][0]["id"], "Q42$1");
        assert_eq!(value["sitelinks"]["enwiki"]["badges"], json!(["Q17"]));
    }

    #[test]
    fn round_trip() {
        let item = sample_item();
        let value = ItemSerializer.serialize(&item).unwrap();
        let back = ItemSerializer.deserialize(&value).unwrap();
        assert!(back.equals(&item));
        assert_eq!(back.id(), item.id());
    }

    #[test]
    fn empty_item_without_id_round_trips() {
        let value = ItemSerializer.serialize(&Item::default()).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["labels"], json!({}));
        let back = ItemSerializer.deserialize(&value).unwrap();
        assert!(back.is_empty());
        assert!(back.id().is_none());
    }

    #[test]
    fn minimal_json_accepted() {
        let back = ItemSerializer
            .deserialize(&json!({"type": "item", "labels": {"de": {"language": "de", "value": "Katze"}}}))
            .unwrap();
        assert_eq!(back.fingerprint().unwrap().labels().text("de"), Some("Katze"));
    }

    #[test]
    fn wrong_entity_rejected() {
        let err = ItemSerializer
            .serialize(&PhraseDocument::default())
            .unwrap_err();
        assert!(matches!(err, SerializationError::Model(_)));

        let err = ItemSerializer
            .deserialize(&json!({"type": "property"}))
            .unwrap_err();
        assert!(matches!(err, SerializationError::TypeMismatch { .. }));
    }

    #[test]
    fn invalid_id_rejected() {
        let err = ItemSerializer
            .deserialize(&json!({"type": "item", "id": "P1"}))
            .unwrap_err();
        assert!(matches!(err, SerializationError::Json(_)));
    }
}
