//! JSON-Patch pathway for Wikibase entities.
//!
//! Clients edit entities by sending RFC 6902 JSON-Patch documents against a
//! JSON view of the entity. This crate validates such requests, applies them
//! operation by operation, and checks the patched labels and descriptions.
//! Every failure carries a stable error code (see [`PatchError::code`]).
//!
//! # Key Types
//!
//! - [`validate_patch`] — structural checks, first failure wins
//! - [`apply_patch`] — apply to a copy of any JSON value
//! - [`patch_labels`] / [`patch_descriptions`] — patch the `{language: text}` view of a term list
//! - [`patch_entity`] — patch the serialized form of a whole entity
//! - [`TermRules`] — length and language constraints on patched terms

pub mod apply;
pub mod entity;
pub mod error;
pub mod request;
pub mod terms;

pub use apply::apply_patch;
pub use entity::patch_entity;
pub use error::{PatchError, Result, TermKind};
pub use request::validate_patch;
pub use terms::{
    patch_descriptions, patch_labels, patch_terms, term_map, TermRules, DEFAULT_MAX_LENGTH,
};
