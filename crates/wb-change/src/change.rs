//! The entity change record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use wb_diff::Diff;
use wb_types::EntityId;

use crate::aspects::EntityDiffChangedAspects;
use crate::error::{ChangeError, Result};

/// MediaWiki timestamp layout.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format a time as `YYYYMMDDHHMMSS`.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a `YYYYMMDDHHMMSS` timestamp.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if s.len() != 14 {
        return Err(ChangeError::InvalidTimestamp(s.to_string()));
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|_| ChangeError::InvalidTimestamp(s.to_string()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Remove,
    Update,
    Restore,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = ChangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "update" => Ok(Self::Update),
            "restore" => Ok(Self::Restore),
            other => Err(ChangeError::UnknownChangeType(other.to_string())),
        }
    }
}

/// Revision the change belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeFields {
    pub revision_id: u64,
    /// Whole seconds only, as stored by the host wiki.
    pub time: Option<DateTime<Utc>>,
}

/// Who made the change and in which page revision. The revision id itself
/// lives in [`ChangeFields`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeMetadata {
    pub user_id: u64,
    pub user_name: String,
    pub central_user_id: u64,
    pub bot: bool,
    pub comment: String,
    pub page_id: u64,
    pub parent_id: u64,
}

/// Revision-level metadata attached after the edit is saved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevisionMetadata {
    pub bot: bool,
    pub comment: String,
    pub page_id: u64,
    pub parent_id: u64,
}

/// A diff of one entity plus the revision and user metadata that is
/// propagated to subscriber wikis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityChange {
    id: Option<u64>,
    entity_id: EntityId,
    change_type: ChangeType,
    diff: Diff,
    aspects: EntityDiffChangedAspects,
    fields: ChangeFields,
    metadata: ChangeMetadata,
}

impl EntityChange {
    /// A change without metadata. The changed aspects are derived from `diff`.
    pub fn new_from_diff(change_type: ChangeType, entity_id: EntityId, diff: Diff) -> Self {
        let aspects = EntityDiffChangedAspects::from_entity_diff(&diff);
        Self {
            id: None,
            entity_id,
            change_type,
            diff,
            aspects,
            fields: ChangeFields::default(),
            metadata: ChangeMetadata::default(),
        }
    }

    /// Rebuild a change from its stored parts.
    pub(crate) fn from_parts(
        entity_id: EntityId,
        change_type: ChangeType,
        diff: Diff,
        aspects: EntityDiffChangedAspects,
        fields: ChangeFields,
        metadata: ChangeMetadata,
    ) -> Self {
        Self {
            id: None,
            entity_id,
            change_type,
            diff,
            aspects,
            fields,
            metadata,
        }
    }

    /// Storage id, assigned when the change is first saved.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// The qualified type, e.g. `wikibase-item~update`.
    pub fn type_string(&self) -> String {
        format!(
            "wikibase-{}~{}",
            self.entity_id.entity_type(),
            self.change_type
        )
    }

    pub fn diff(&self) -> &Diff {
        &self.diff
    }

    pub fn aspects(&self) -> &EntityDiffChangedAspects {
        &self.aspects
    }

    pub fn fields(&self) -> &ChangeFields {
        &self.fields
    }

    pub fn metadata(&self) -> &ChangeMetadata {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }

    pub fn set_fields(&mut self, revision_id: u64, time: DateTime<Utc>) {
        self.fields = ChangeFields {
            revision_id,
            time: Some(time.trunc_subsecs(0)),
        };
    }

    /// Replace the revision-level metadata. User metadata is kept.
    pub fn set_metadata(&mut self, metadata: RevisionMetadata) {
        self.metadata.bot = metadata.bot;
        self.metadata.comment = metadata.comment;
        self.metadata.page_id = metadata.page_id;
        self.metadata.parent_id = metadata.parent_id;
    }

    pub fn add_user_metadata(
        &mut self,
        user_id: u64,
        user_name: impl Into<String>,
        central_user_id: u64,
    ) {
        self.metadata.user_id = user_id;
        self.metadata.user_name = user_name.into();
        self.metadata.central_user_id = central_user_id;
    }
}
