//! A compact summary of what an entity diff touches.
//!
//! Subscriber wikis use the summary to decide whether a change is relevant to
//! them without walking the full diff.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wb_diff::{Diff, DiffOp};

use crate::error::ChangeError;

/// Only version of the compact format.
pub const ARRAY_FORMAT_VERSION: u32 = 1;

const LABEL: &str = "label";
const DESCRIPTION: &str = "description";
const CLAIM: &str = "claim";
const SITELINK: &str = "sitelink";
const NAME: &str = "name";
const BADGES: &str = "badges";

/// Old page, new page, and whether the badges changed. Serialized as a
/// three-element array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLinkChange(pub Option<String>, pub Option<String>, pub bool);

impl SiteLinkChange {
    fn from_op(op: &DiffOp) -> Self {
        let page = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);
        match op {
            DiffOp::Diff(nested) => {
                let name = nested.get(NAME);
                Self(
                    page(name.and_then(DiffOp::old_value)),
                    page(name.and_then(DiffOp::new_value)),
                    nested.get(BADGES).is_some_and(|b| !b.is_empty()),
                )
            }
            atomic => Self(page(atomic.old_value()), page(atomic.new_value()), false),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CompactDiff", into = "CompactDiff")]
pub struct EntityDiffChangedAspects {
    /// Languages whose label changed, sorted.
    pub label_changes: Vec<String>,
    /// Languages whose description changed, sorted.
    pub description_changes: Vec<String>,
    /// Property ids with statement changes, sorted.
    pub statement_changes: Vec<String>,
    pub site_link_changes: BTreeMap<String, SiteLinkChange>,
    /// Anything else changed (aliases, content, data type, ...).
    pub other_changes: bool,
}

fn sorted_keys(diff: &Diff, key: &str) -> Vec<String> {
    diff.get_diff(key)
        .map(|d| d.keys().map(str::to_string).collect::<BTreeSet<_>>())
        .unwrap_or_default()
        .into_iter()
        .collect()
}

impl EntityDiffChangedAspects {
    pub fn from_entity_diff(diff: &Diff) -> Self {
        let site_link_changes = diff
            .get_diff(SITELINK)
            .map(|sites| {
                sites
                    .entries()
                    .map(|(site, op)| (site.to_string(), SiteLinkChange::from_op(op)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            label_changes: sorted_keys(diff, LABEL),
            description_changes: sorted_keys(diff, DESCRIPTION),
            statement_changes: sorted_keys(diff, CLAIM),
            site_link_changes,
            other_changes: diff
                .keys()
                .any(|k| ![LABEL, DESCRIPTION, CLAIM, SITELINK].contains(&k)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label_changes.is_empty()
            && self.description_changes.is_empty()
            && self.statement_changes.is_empty()
            && self.site_link_changes.is_empty()
            && !self.other_changes
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompactDiff {
    array_format_version: u32,
    #[serde(default)]
    label_changes: Vec<String>,
    #[serde(default)]
    description_changes: Vec<String>,
    #[serde(default)]
    statement_changes: Vec<String>,
    #[serde(default)]
    site_link_changes: BTreeMap<String, SiteLinkChange>,
    #[serde(default)]
    other_changes: bool,
}

impl From<EntityDiffChangedAspects> for CompactDiff {
    fn from(aspects: EntityDiffChangedAspects) -> Self {
        Self {
            array_format_version: ARRAY_FORMAT_VERSION,
            label_changes: aspects.label_changes,
            description_changes: aspects.description_changes,
            statement_changes: aspects.statement_changes,
            site_link_changes: aspects.site_link_changes,
            other_changes: aspects.other_changes,
        }
    }
}

impl TryFrom<CompactDiff> for EntityDiffChangedAspects {
    type Error = ChangeError;

    fn try_from(compact: CompactDiff) -> Result<Self, ChangeError> {
        if compact.array_format_version != ARRAY_FORMAT_VERSION {
            return Err(ChangeError::UnsupportedFormatVersion(
                compact.array_format_version,
            ));
        }
        Ok(Self {
            label_changes: compact.label_changes,
            description_changes: compact.description_changes,
            statement_changes: compact.statement_changes,
            site_link_changes: compact.site_link_changes,
            other_changes: compact.other_changes,
        })
    }
}
