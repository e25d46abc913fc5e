use serde::{Deserialize, Serialize};
use serde_json::Value;
use wb_model::{downcast, EntityDocument, Property};
use wb_types::{entity_type, PropertyId};

use crate::error::Result;
use crate::fields::{claims_of, statements_from, Claims, TermFields};
use crate::traits::{expect_type, EntityDeserializer, EntitySerializer};

#[derive(Serialize, Deserialize)]
struct SerializedProperty {
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<PropertyId>,
    #[serde(default)]
    datatype: String,
    #[serde(flatten)]
    terms: TermFields,
    #[serde(default)]
    claims: Claims,
}

/// JSON form of [`Property`]; like an item without sitelinks, plus `datatype`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertySerializer;

impl EntitySerializer for PropertySerializer {
    fn serialize(&self, entity: &dyn EntityDocument) -> Result<Value> {
        let property = downcast::<Property>(entity, entity_type::PROPERTY)?;
        let serialized = SerializedProperty {
            entity_type: entity_type::PROPERTY.to_string(),
            id: property.property_id(),
            datatype: property.data_type.clone(),
            terms: TermFields::from(&property.fingerprint),
            claims: claims_of(&property.statements),
        };
        Ok(serde_json::to_value(serialized)?)
    }
}

impl EntityDeserializer for PropertySerializer {
    fn deserialize(&self, value: &Value) -> Result<Box<dyn EntityDocument>> {
        expect_type(value, entity_type::PROPERTY)?;
        let serialized: SerializedProperty = serde_json::from_value(value.clone())?;
        let mut property = Property::new(serialized.id, serialized.datatype);
        property.fingerprint = serialized.terms.into();
        property.statements = statements_from(serialized.claims)?;
        Ok(Box::new(property))
    }
}
