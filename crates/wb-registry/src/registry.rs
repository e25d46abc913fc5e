//! The entity type registry.
//!
//! [`EntityTypeRegistry`] maps an entity type tag to its
//! [`EntityTypeDefinition`]. It is filled once at startup and then shared
//! read-only, usually behind an `Arc`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;
use wb_diff::{EntityDifferStrategy, EntityPatcherStrategy};
use wb_model::EntityDocument;
use wb_serialization::{entity_type_of, EntityDeserializer, EntitySerializer};
use wb_types::EntityId;

use crate::builtin;
use crate::definition::EntityTypeDefinition;
use crate::error::{RegistryError, Result};

/// Entity type definitions indexed by type tag.
#[derive(Debug, Default)]
pub struct EntityTypeRegistry {
    definitions: Vec<EntityTypeDefinition>,
    index: HashMap<&'static str, usize>,
}

impl EntityTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `item`, `property`, `one-string` and `phrase`.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        for definition in builtin::all() {
            registry.insert(definition);
        }
        registry
    }

    /// Add a definition. Fails if the type is already registered.
    pub fn register(&mut self, definition: EntityTypeDefinition) -> Result<()> {
        if self.index.contains_key(definition.entity_type) {
            return Err(RegistryError::DuplicateType {
                entity_type: definition.entity_type.to_string(),
            });
        }
        self.insert(definition);
        Ok(())
    }

    fn insert(&mut self, definition: EntityTypeDefinition) {
        debug!(
            entity_type = definition.entity_type,
            content_model = definition.content_model_id,
            "registered entity type"
        );
        self.index
            .insert(definition.entity_type, self.definitions.len());
        self.definitions.push(definition);
    }

    pub fn get(&self, entity_type: &str) -> Result<&EntityTypeDefinition> {
        self.index
            .get(entity_type)
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| RegistryError::UnregisteredType {
                entity_type: entity_type.to_string(),
            })
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.index.contains_key(entity_type)
    }

    /// Registered type tags, in registration order.
    pub fn entity_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|d| d.entity_type)
    }

    pub fn get_differ(&self, entity_type: &str) -> Result<Box<dyn EntityDifferStrategy>> {
        Ok((self.get(entity_type)?.differ)())
    }

    pub fn get_patcher(&self, entity_type: &str) -> Result<Box<dyn EntityPatcherStrategy>> {
        Ok((self.get(entity_type)?.patcher)())
    }

    pub fn get_serializer(&self, entity_type: &str) -> Result<Box<dyn EntitySerializer>> {
        Ok((self.get(entity_type)?.serializer)())
    }

    pub fn get_deserializer(&self, entity_type: &str) -> Result<Box<dyn EntityDeserializer>> {
        Ok((self.get(entity_type)?.deserializer)())
    }

    /// A new empty document of the given type.
    pub fn new_document(&self, entity_type: &str) -> Result<Box<dyn EntityDocument>> {
        Ok((self.get(entity_type)?.document_factory)())
    }

    /// Parse an id serialization by trying each registered id pattern in
    /// registration order.
    pub fn parse_id(&self, serialization: &str) -> Result<EntityId> {
        self.definitions
            .iter()
            .filter(|d| d.id_pattern.matches(serialization))
            .find_map(|d| (d.id_builder)(serialization).ok())
            .ok_or_else(|| RegistryError::InvalidId {
                serialization: serialization.to_string(),
            })
    }

    /// Build an id of a known type with that type's id builder.
    pub fn build_id(&self, entity_type: &str, serialization: &str) -> Result<EntityId> {
        let definition = self.get(entity_type)?;
        if !definition.id_pattern.matches(serialization) {
            return Err(RegistryError::InvalidId {
                serialization: serialization.to_string(),
            });
        }
        (definition.id_builder)(serialization).map_err(|_| RegistryError::InvalidId {
            serialization: serialization.to_string(),
        })
    }

    /// Serialize an entity with the serializer of its type.
    pub fn serialize(&self, entity: &dyn EntityDocument) -> Result<Value> {
        Ok(self.get_serializer(entity.entity_type())?.serialize(entity)?)
    }

    /// Deserialize an entity, dispatching on its `type` field.
    pub fn deserialize(&self, value: &Value) -> Result<Box<dyn EntityDocument>> {
        let entity_type = entity_type_of(value)?;
        Ok(self.get_deserializer(entity_type)?.deserialize(value)?)
    }
}
