//! Definitions of the built-in entity types.

use wb_diff::{
    ItemDiffer, ItemPatcher, OneStringDiffer, OneStringPatcher, PhraseDiffer, PhrasePatcher,
    PropertyDiffer, PropertyPatcher,
};
use wb_model::{Capabilities, Item, OneString, PhraseDocument, Property};
use wb_serialization::{ItemSerializer, OneStringSerializer, PhraseSerializer, PropertySerializer};
use wb_types::{entity_type, EntityId, ItemId, OneStringId, PhraseId, PropertyId};

use crate::definition::{EntityTypeDefinition, IdPattern};

pub const ITEM_CONTENT_MODEL: &str = "wikibase-item";
pub const PROPERTY_CONTENT_MODEL: &str = "wikibase-property";
pub const ONE_STRING_CONTENT_MODEL: &str = "one-string";
pub const PHRASE_CONTENT_MODEL: &str = "phrase";

pub fn item() -> EntityTypeDefinition {
    EntityTypeDefinition {
        entity_type: entity_type::ITEM,
        content_model_id: ITEM_CONTENT_MODEL,
        capabilities: Capabilities {
            fingerprint: true,
            statements: true,
            sitelinks: true,
        },
        differ: || Box::new(ItemDiffer),
        patcher: || Box::new(ItemPatcher),
        serializer: || Box::new(ItemSerializer),
        deserializer: || Box::new(ItemSerializer),
        id_pattern: IdPattern::new("Q[1-9][0-9]*", ItemId::is_valid),
        id_builder: |s| s.parse::<ItemId>().map(EntityId::from),
        document_factory: || Box::new(Item::default()),
    }
}

pub fn property() -> EntityTypeDefinition {
    EntityTypeDefinition {
        entity_type: entity_type::PROPERTY,
        content_model_id: PROPERTY_CONTENT_MODEL,
        capabilities: Capabilities {
            fingerprint: true,
            statements: true,
            sitelinks: false,
        },
        differ: || Box::new(PropertyDiffer),
        patcher: || Box::new(PropertyPatcher),
        serializer: || Box::new(PropertySerializer),
        deserializer: || Box::new(PropertySerializer),
        id_pattern: IdPattern::new("P[1-9][0-9]*", PropertyId::is_valid),
        id_builder: |s| s.parse::<PropertyId>().map(EntityId::from),
        document_factory: || Box::new(Property::default()),
    }
}

pub fn one_string() -> EntityTypeDefinition {
    EntityTypeDefinition {
        entity_type: entity_type::ONE_STRING,
        content_model_id: ONE_STRING_CONTENT_MODEL,
        capabilities: Capabilities {
            fingerprint: true,
            statements: false,
            sitelinks: false,
        },
        differ: || Box::new(OneStringDiffer),
        patcher: || Box::new(OneStringPatcher),
        serializer: || Box::new(OneStringSerializer),
        deserializer: || Box::new(OneStringSerializer),
        id_pattern: IdPattern::new("[1-9a-z][0-9a-z]* (case-insensitive)", OneStringId::is_valid),
        id_builder: |s| s.parse::<OneStringId>().map(EntityId::from),
        document_factory: || Box::new(OneString::default()),
    }
}

pub fn phrase() -> EntityTypeDefinition {
    EntityTypeDefinition {
        entity_type: entity_type::PHRASE,
        content_model_id: PHRASE_CONTENT_MODEL,
        capabilities: Capabilities::NONE,
        differ: || Box::new(PhraseDiffer),
        patcher: || Box::new(PhrasePatcher),
        serializer: || Box::new(PhraseSerializer),
        deserializer: || Box::new(PhraseSerializer),
        id_pattern: IdPattern::new("[^\\s/]+", PhraseId::is_valid),
        id_builder: |s| s.parse::<PhraseId>().map(EntityId::from),
        document_factory: || Box::new(PhraseDocument::default()),
    }
}

/// All built-in definitions, in id-parsing precedence order.
pub fn all() -> [EntityTypeDefinition; 4] {
    [item(), property(), one_string(), phrase()]
}
