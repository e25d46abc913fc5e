//! Repository-side services built on the diff and change core.
//!
//! # Key Types
//!
//! - [`RepoConfig`] — settings loaded from TOML
//! - [`EditPipeline`] — records saved edits as changes, rebases conflicting edits
//! - [`RecentChangeSaveHandler`] — copies RecentChange data into stored changes
//! - [`ChangeOpSiteLink`] — sets or removes a sitelink on an item

pub mod change_op;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod recent_change;

pub use change_op::{ChangeOpSiteLink, Summary};
pub use config::{RepoConfig, StringLimits};
pub use error::{RepoError, Result};
pub use pipeline::{EditPipeline, RevisionInfo};
pub use recent_change::{CentralIdLookup, DispatchQueue, RecentChange, RecentChangeSaveHandler};
