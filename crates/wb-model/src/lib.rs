//! Entity document model for Wikibase.
//!
//! Every entity is an [`EntityDocument`]: it has an entity type tag, an
//! optional id (absent before the first save), structural emptiness and
//! equality, and a deep [`EntityDocument::copy`]. Beyond that, each concrete
//! type declares which capabilities it carries:
//!
//! | Type               | Fingerprint | Statements | Sitelinks | Other fields          |
//! |--------------------|-------------|------------|-----------|-----------------------|
//! | [`Item`]           | yes         | yes        | yes       |                       |
//! | [`Property`]       | yes         | yes        |           | `data_type`           |
//! | [`OneString`]      | yes         |            |           | `content`             |
//! | [`PhraseDocument`] |             |            |           | `language`, `phrase`  |
//!
//! Capabilities are composed: an entity holds its [`Fingerprint`] as a field
//! and exposes it through the optional accessors on the trait.
//!
//! [`Fingerprint`]: wb_types::Fingerprint

pub mod entity;
pub mod error;
pub mod item;
pub mod one_string;
pub mod phrase;
pub mod property;
pub mod sitelink;
pub mod statement;

pub use entity::{downcast, downcast_mut, Capabilities, EntityDocument};
pub use error::{ModelError, Result};
pub use item::Item;
pub use one_string::OneString;
pub use phrase::{PhraseDocument, DEFAULT_LANGUAGE};
pub use property::Property;
pub use sitelink::{badge_sets_equal, SiteLink, SiteLinkList};
pub use statement::{
    DataValue, Rank, Reference, Snak, Statement, StatementGuidGenerator, StatementList,
};
