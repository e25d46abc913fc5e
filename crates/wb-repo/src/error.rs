//! Error types for repository services.

use thiserror::Error;
use wb_change::ChangeError;
use wb_model::ModelError;
use wb_patch::PatchError;
use wb_registry::RegistryError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepoError {
    /// The configuration file could not be read or parsed.
    #[error("invalid configuration in {path}: {reason}")]
    Config { path: String, reason: String },

    /// A badge-only sitelink change for a site the item has no link to.
    #[error("no sitelink for site {site_id}")]
    NoSuchSiteLink { site_id: String },

    /// A badge that is not in the configured allowlist.
    #[error("badge {badge} is not allowed")]
    BadgeNotAllowed { badge: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Change(#[from] ChangeError),
}

/// Convenience alias for repository results.
pub type Result<T> = std::result::Result<T, RepoError>;
