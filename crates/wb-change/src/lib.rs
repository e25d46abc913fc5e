//! Entity change records for Wikibase.
//!
//! An [`EntityChange`] wraps the diff of one edit together with revision and
//! user metadata. Changes are created by the [`EntityChangeFactory`], kept in
//! a [`ChangeStore`], and serialized for subscriber wikis by the
//! [`ChangeCodec`].
//!
//! # Key Types
//!
//! - [`EntityChange`] — diff plus metadata, with a [`ChangeType`]
//! - [`EntityDiffChangedAspects`] — compact summary of what a diff touches
//! - [`ChangeCodec`] — wire format (`entityId`, `changeType`, `diffOps`, `compactDiff`, `metadata`)
//! - [`ChangeStore`] / [`InMemoryChangeStore`] — change storage

pub mod aspects;
pub mod change;
pub mod error;
pub mod factory;
pub mod store;
pub mod wire;

pub use aspects::{EntityDiffChangedAspects, SiteLinkChange, ARRAY_FORMAT_VERSION};
pub use change::{
    format_timestamp, parse_timestamp, ChangeFields, ChangeMetadata, ChangeType, EntityChange,
    RevisionMetadata,
};
pub use error::{ChangeError, Result};
pub use factory::EntityChangeFactory;
pub use store::{ChangeStore, InMemoryChangeStore};
pub use wire::ChangeCodec;
