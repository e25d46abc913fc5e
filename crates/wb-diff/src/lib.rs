//! Structural entity diffs for Wikibase.
//!
//! Computes field-by-field diffs between two snapshots of an entity and
//! applies such diffs back onto an entity, with one differ and one patcher
//! strategy per entity type.
//!
//! # Key Types
//!
//! - [`Diff`] / [`DiffOp`] — Keyed or list diff of `Add`/`Remove`/`Change`/nested operations
//! - [`EntityDifferStrategy`] / [`EntityPatcherStrategy`] — Per-type strategies
//! - [`PatchMode`] — Strict (fail on mismatch) or force (overwrite) patching
//! - [`ItemDiffer`], [`PropertyDiffer`], [`OneStringDiffer`], [`PhraseDiffer`] and
//!   their patchers — Built-in strategies
//!
//! # Entity diff keys
//!
//! | Key           | Shape                                               |
//! |---------------|-----------------------------------------------------|
//! | `label`       | language -> op on the text                          |
//! | `description` | language -> op on the text                          |
//! | `aliases`     | language -> list diff of alias strings              |
//! | `claim`       | property id -> statement GUID (or `~n`) -> op       |
//! | `sitelink`    | site id -> op on the page name, or `{name, badges}` |
//! | `datatype`    | op on the property data type                        |
//! | `content`     | op on the one-string content                        |
//! | `language`    | op on the phrase language                           |
//! | `phrase`      | op on the phrase text                               |

pub mod diff;
pub mod error;
pub mod fingerprint;
pub mod item;
pub mod one_string;
pub mod ops;
pub mod phrase;
pub mod property;
pub mod sitelinks;
pub mod statements;
pub mod strategy;

pub use diff::{Diff, DiffOp};
pub use error::{DiffError, DiffResult};
pub use item::{ItemDiffer, ItemPatcher};
pub use one_string::{OneStringDiffer, OneStringPatcher};
pub use ops::{diff_field, diff_maps, diff_sets, diff_strings, PatchMode};
pub use phrase::{PhraseDiffer, PhrasePatcher};
pub use property::{PropertyDiffer, PropertyPatcher};
pub use strategy::{EntityDifferStrategy, EntityPatcherStrategy};
