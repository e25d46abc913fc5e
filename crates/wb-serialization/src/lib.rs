//! Serialized JSON form of Wikibase entities.
//!
//! Each entity type has a serializer and a deserializer mapping between the
//! in-memory [`EntityDocument`] and its JSON value. The entity type registry
//! hands them out per type; the JSON-Patch pathway and the CLI work on the
//! serialized form.
//!
//! # Key Types
//!
//! - [`EntitySerializer`] / [`EntityDeserializer`] — Per-type conversion traits
//! - [`ItemSerializer`], [`PropertySerializer`], [`OneStringSerializer`],
//!   [`PhraseSerializer`] — Built-in implementations (each implements both traits)
//! - [`SerializationError`] — Errors from malformed or mistyped input
//!
//! [`EntityDocument`]: wb_model::EntityDocument

pub mod error;
mod fields;
pub mod item;
pub mod one_string;
pub mod phrase;
pub mod property;
pub mod traits;

pub use error::{Result, SerializationError};
pub use item::ItemSerializer;
pub use one_string::OneStringSerializer;
pub use phrase::PhraseSerializer;
pub use property::PropertySerializer;
pub use traits::{entity_type_of, EntityDeserializer, EntitySerializer};
