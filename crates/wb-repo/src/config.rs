//! Repository settings, loaded from TOML.
//!
//! ```toml
//! dispatch_via_jobs_enabled = true
//! conflict_mode = "strict"
//! allowed_languages = ["en", "de"]
//!
//! [string_limits]
//! multilang_max_length = 400
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wb_diff::PatchMode;
use wb_patch::{TermRules, DEFAULT_MAX_LENGTH};

use crate::error::{RepoError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepoConfig {
    #[serde(default)]
    pub string_limits: StringLimits,
    /// Enqueue a dispatch job after a change got its RecentChange metadata.
    #[serde(default)]
    pub dispatch_via_jobs_enabled: bool,
    /// Mode used when rebasing an edit onto a newer revision.
    #[serde(default)]
    pub conflict_mode: PatchMode,
    /// Language codes accepted for terms. `None` accepts every valid code.
    #[serde(default)]
    pub allowed_languages: Option<BTreeSet<String>>,
    /// Item ids usable as sitelink badges. `None` accepts any item.
    #[serde(default)]
    pub allowed_badges: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLimits {
    #[serde(default = "default_multilang_max_length")]
    pub multilang_max_length: usize,
}

impl Default for StringLimits {
    fn default() -> Self {
        Self {
            multilang_max_length: default_multilang_max_length(),
        }
    }
}

fn default_multilang_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl RepoConfig {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| RepoError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content).map_err(|reason| RepoError::Config {
            path: path.display().to_string(),
            reason,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Term checks for JSON-Patch edits.
    pub fn term_rules(&self) -> TermRules {
        TermRules {
            max_length: self.string_limits.multilang_max_length,
            allowed_languages: self.allowed_languages.clone(),
        }
    }

    pub fn badge_allowed(&self, badge: &str) -> bool {
        self.allowed_badges
            .as_ref()
            .map_or(true, |allowed| allowed.contains(badge))
    }
}
