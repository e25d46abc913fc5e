use std::fmt;

use wb_diff::{EntityDifferStrategy, EntityPatcherStrategy};
use wb_model::{Capabilities, EntityDocument};
use wb_serialization::{EntityDeserializer, EntitySerializer};
use wb_types::EntityId;

/// The id grammar of an entity type.
#[derive(Clone, Copy)]
pub struct IdPattern {
    /// Human-readable form of the grammar, e.g. `Q[1-9][0-9]*`.
    pub display: &'static str,
    matcher: fn(&str) -> bool,
}

impl IdPattern {
    pub const fn new(display: &'static str, matcher: fn(&str) -> bool) -> Self {
        Self { display, matcher }
    }

    pub fn matches(&self, serialization: &str) -> bool {
        (self.matcher)(serialization)
    }
}

impl fmt::Debug for IdPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdPattern").field(&self.display).finish()
    }
}

/// Everything the core needs to know about one entity type.
///
/// Services are built on demand through the function pointers, so a
/// definition is plain data and can be registered once at startup.
#[derive(Clone, Copy)]
pub struct EntityTypeDefinition {
    pub entity_type: &'static str,
    pub content_model_id: &'static str,
    pub capabilities: Capabilities,
    pub differ: fn() -> Box<dyn EntityDifferStrategy>,
    pub patcher: fn() -> Box<dyn EntityPatcherStrategy>,
    pub serializer: fn() -> Box<dyn EntitySerializer>,
    pub deserializer: fn() -> Box<dyn EntityDeserializer>,
    pub id_pattern: IdPattern,
    pub id_builder: fn(&str) -> wb_types::Result<EntityId>,
    pub document_factory: fn() -> Box<dyn EntityDocument>,
}

impl fmt::Debug for EntityTypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityTypeDefinition")
            .field("entity_type", &self.entity_type)
            .field("content_model_id", &self.content_model_id)
            .field("capabilities", &self.capabilities)
            .field("id_pattern", &self.id_pattern)
            .finish_non_exhaustive()
    }
}
