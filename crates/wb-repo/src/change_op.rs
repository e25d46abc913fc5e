//! Sitelink change operation.

use std::fmt;

use wb_model::{downcast_mut, EntityDocument, Item, SiteLink};
use wb_types::{entity_type, ItemId};

use crate::config::RepoConfig;
use crate::error::{RepoError, Result};

/// Edit summary produced by a change op: an action name and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub action: String,
    pub site_id: String,
    pub args: Vec<String>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/* wbsetsitelink-{}:{}|{} */", self.action, self.args.len(), self.site_id)?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// Sets, changes or removes one sitelink of an item.
///
/// `page_name: None` keeps the current page name, `badges: None` keeps the
/// current badges. With both `None`, or with an empty page name, the link is
/// removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOpSiteLink {
    site_id: String,
    page_name: Option<String>,
    badges: Option<Vec<ItemId>>,
}

impl ChangeOpSiteLink {
    pub fn new(
        site_id: impl Into<String>,
        page_name: Option<String>,
        badges: Option<Vec<ItemId>>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            page_name,
            badges,
        }
    }

    /// Removes the link for `site_id`.
    pub fn remove(site_id: impl Into<String>) -> Self {
        Self::new(site_id, None, None)
    }

    fn is_removal(&self) -> bool {
        match &self.page_name {
            None => self.badges.is_none(),
            Some(page_name) => page_name.is_empty(),
        }
    }

    /// Check the badges against the configured allowlist.
    pub fn validate(&self, config: &RepoConfig) -> Result<()> {
        for badge in self.badges.iter().flatten() {
            let badge = badge.to_string();
            if !config.badge_allowed(&badge) {
                return Err(RepoError::BadgeNotAllowed { badge });
            }
        }
        Ok(())
    }

    /// Apply to `entity`, which must be an item. Returns the edit summary, or
    /// `None` when removing a link that does not exist.
    pub fn apply(&self, entity: &mut dyn EntityDocument) -> Result<Option<Summary>> {
        let item = downcast_mut::<Item>(entity, entity_type::ITEM)?;
        let existing = item.sitelinks.get(&self.site_id).cloned();

        if self.is_removal() {
            return Ok(existing.map(|link| {
                item.sitelinks.remove_by_site(&self.site_id);
                self.summary("remove", vec![link.page_name().to_string()])
            }));
        }

        let mut args = Vec::new();
        let page_name = match (&self.page_name, &existing) {
            (Some(page_name), _) => {
                args.push(page_name.clone());
                page_name.clone()
            }
            (None, Some(link)) => link.page_name().to_string(),
            (None, None) => {
                return Err(RepoError::NoSuchSiteLink {
                    site_id: self.site_id.clone(),
                })
            }
        };

        let mut action = if existing.is_some() { "set" } else { "add" }.to_string();
        let existing_badges = existing.as_ref().map(|l| l.badges()).unwrap_or_default();
        let badges = match &self.badges {
            None => existing_badges.to_vec(),
            Some(badges) if badges.is_empty() && existing_badges.is_empty() => Vec::new(),
            Some(badges) => {
                action.push_str(if self.page_name.is_none() { "-badges" } else { "-both" });
                args.push(
                    badges
                        .iter()
                        .map(ItemId::to_string)
                        .collect::<Vec<_>>()
                        .join("|"),
                );
                badges.clone()
            }
        };

        item.sitelinks
            .set(SiteLink::new(self.site_id.as_str(), page_name, badges)?);
        Ok(Some(self.summary(&action, args)))
    }

    fn summary(&self, action: &str, args: Vec<String>) -> Summary {
        Summary {
            action: action.to_string(),
            site_id: self.site_id.clone(),
            args,
        }
    }
}
