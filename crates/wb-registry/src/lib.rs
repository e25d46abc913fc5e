//! Entity type registry for Wikibase.
//!
//! Every entity type the core knows about is described by one
//! [`EntityTypeDefinition`]: its content model, capabilities, id grammar and
//! builders for its differ, patcher, serializer and deserializer. The
//! [`EntityTypeRegistry`] holds these definitions and dispatches by type tag.
//!
//! # Key Types
//!
//! - [`EntityTypeRegistry`] — type tag to definition map, built once and shared via `Arc`
//! - [`EntityTypeDefinition`] — everything known about one entity type
//! - [`EntityDiffer`] — diffs two entities of the same (any) type
//! - [`EntityPatcher`] — applies a diff to a copy of an entity

pub mod builtin;
pub mod definition;
pub mod error;
pub mod registry;
pub mod services;

#[cfg(test)]
mod invariants;

pub use definition::{EntityTypeDefinition, IdPattern};
pub use error::{RegistryError, Result};
pub use registry::EntityTypeRegistry;
pub use services::{EntityDiffer, EntityPatcher};
