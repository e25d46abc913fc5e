//! Foundation types for Wikibase.
//!
//! This crate provides the multilingual term model and the entity identifier
//! types used throughout the workspace. Every other `wb-*` crate depends on
//! `wb-types`.
//!
//! # Key Types
//!
//! - [`Term`] / [`TermList`] — one text per language (labels, descriptions)
//! - [`AliasGroup`] / [`AliasGroupList`] — ordered, de-duplicated aliases per language
//! - [`Fingerprint`] — the label/description/alias bundle of an entity
//! - [`EntityId`] — generic `(entity type, serialization)` identifier
//! - [`ItemId`], [`PropertyId`], [`OneStringId`], [`PhraseId`] — typed identifiers

pub mod alias;
pub mod error;
pub mod fingerprint;
pub mod id;
pub mod language;
pub mod term;

pub use alias::{AliasGroup, AliasGroupList};
pub use error::{Result, TypeError};
pub use fingerprint::Fingerprint;
pub use id::{entity_type, EntityId, ItemId, OneStringId, PhraseId, PropertyId};
pub use language::{is_valid_language_code, validate_language_code};
pub use term::{Term, TermList};
