//! Links from an item to pages on other wikis.

use std::collections::{BTreeMap, HashSet};

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use wb_types::ItemId;

use crate::error::{ModelError, Result};

/// A link to the page `page_name` on site `site_id`, with badge items.
///
/// Badges are deduplicated keeping insertion order and compared as a set.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSiteLink")]
pub struct SiteLink {
    #[serde(rename = "site")]
    site_id: String,
    #[serde(rename = "title")]
    page_name: String,
    badges: Vec<ItemId>,
}

#[derive(Deserialize)]
struct RawSiteLink {
    site: String,
    title: String,
    #[serde(default)]
    badges: Vec<ItemId>,
}

impl TryFrom<RawSiteLink> for SiteLink {
    type Error = ModelError;

    fn try_from(raw: RawSiteLink) -> Result<Self> {
        SiteLink::new(raw.site, raw.title, raw.badges)
    }
}

impl SiteLink {
    pub fn new(
        site_id: impl Into<String>,
        page_name: impl Into<String>,
        badges: impl IntoIterator<Item = ItemId>,
    ) -> Result<Self> {
        let site_id = site_id.into();
        let page_name = page_name.into();
        if site_id.is_empty() {
            return Err(ModelError::InvalidSiteLink {
                site_id,
                reason: "empty site id".into(),
            });
        }
        if page_name.is_empty() {
            return Err(ModelError::InvalidSiteLink {
                site_id,
                reason: "empty page name".into(),
            });
        }

        let mut seen = HashSet::new();
        let badges = badges.into_iter().filter(|b| seen.insert(*b)).collect();

        Ok(Self {
            site_id,
            page_name,
            badges,
        })
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub fn badges(&self) -> &[ItemId] {
        &self.badges
    }

    /// True when both links carry the same set of badges.
    pub fn same_badges(&self, other: &SiteLink) -> bool {
        badge_sets_equal(&self.badges, &other.badges)
    }
}

impl PartialEq for SiteLink {
    fn eq(&self, other: &Self) -> bool {
        self.site_id == other.site_id && self.page_name == other.page_name && self.same_badges(other)
    }
}

/// Compare two badge lists as sets.
pub fn badge_sets_equal(a: &[ItemId], b: &[ItemId]) -> bool {
    let a: HashSet<&ItemId> = a.iter().collect();
    let b: HashSet<&ItemId> = b.iter().collect();
    a == b
}

/// At most one [`SiteLink`] per site, iterated in site id order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteLinkList {
    links: BTreeMap<String, SiteLink>,
}

impl SiteLinkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link, failing if the site already has one.
    pub fn add(&mut self, link: SiteLink) -> Result<()> {
        if self.links.contains_key(&link.site_id) {
            return Err(ModelError::DuplicateSiteLink {
                site_id: link.site_id,
            });
        }
        self.links.insert(link.site_id.clone(), link);
        Ok(())
    }

    /// Insert or replace the link for the link's site.
    pub fn set(&mut self, link: SiteLink) {
        self.links.insert(link.site_id.clone(), link);
    }

    pub fn get(&self, site_id: &str) -> Option<&SiteLink> {
        self.links.get(site_id)
    }

    pub fn has_link_with_site(&self, site_id: &str) -> bool {
        self.links.contains_key(site_id)
    }

    pub fn remove_by_site(&mut self, site_id: &str) -> Option<SiteLink> {
        self.links.remove(site_id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteLink> {
        self.links.values()
    }

    pub fn site_ids(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }
}

impl FromIterator<SiteLink> for SiteLinkList {
    fn from_iter<I: IntoIterator<Item = SiteLink>>(iter: I) -> Self {
        let mut list = Self::new();
        for link in iter {
            list.set(link);
        }
        list
    }
}

/// Serializes as `{"enwiki": {"site": "enwiki", "title": "Cat", "badges": []}}`.
impl Serialize for SiteLinkList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.links.len()))?;
        for (site, link) in &self.links {
            map.serialize_entry(site, link)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SiteLinkList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, SiteLink>::deserialize(deserializer)?;
        let mut list = SiteLinkList::new();
        for (site, link) in raw {
            if site != link.site_id {
                return Err(serde::de::Error::custom(format!(
                    "sitelink key {site} does not match site {}",
                    link.site_id
                )));
            }
            list.set(link);
        }
        Ok(list)
    }
}
