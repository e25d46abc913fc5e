//! Diff and patch of sitelink lists.
//!
//! A link whose badges are empty on both relevant sides is diffed as a plain
//! operation on the page name. Otherwise the site gets a nested diff with
//! `name` (page name operation, if it changed) and `badges` (set difference,
//! if the badge sets differ).

use std::collections::BTreeSet;

use serde_json::Value;
use wb_model::{SiteLink, SiteLinkList};
use wb_types::ItemId;

use crate::diff::{Diff, DiffOp};
use crate::error::{DiffError, DiffResult};
use crate::ops::{apply_field, apply_set, diff_field, diff_sets, PatchMode};

pub const SITELINK: &str = "sitelink";
pub const NAME: &str = "name";
pub const BADGES: &str = "badges";

fn page(link: Option<&SiteLink>) -> Option<Value> {
    link.map(|l| Value::String(l.page_name().to_string()))
}

fn badge_values(link: Option<&SiteLink>) -> Vec<Value> {
    link.map(|l| {
        l.badges()
            .iter()
            .map(|b| Value::String(b.to_string()))
            .collect()
    })
    .unwrap_or_default()
}

fn diff_site(from: Option<&SiteLink>, to: Option<&SiteLink>) -> Option<DiffOp> {
    if from == to {
        return None;
    }
    let name_op = diff_field(page(from).as_ref(), page(to).as_ref());
    let from_badges = badge_values(from);
    let to_badges = badge_values(to);

    if from_badges.is_empty() && to_badges.is_empty() {
        return name_op;
    }

    let mut nested = Diff::new();
    if let Some(op) = name_op {
        nested.insert(NAME, op);
    }
    nested.insert(BADGES, DiffOp::Diff(diff_sets(&from_badges, &to_badges)));
    Some(DiffOp::Diff(nested))
}

/// The `sitelink` operation for two sitelink lists, or `None` when equal.
pub fn diff_sitelinks(from: &SiteLinkList, to: &SiteLinkList) -> Option<DiffOp> {
    let sites: BTreeSet<&str> = from.site_ids().chain(to.site_ids()).collect();
    let mut diff = Diff::new();
    for site in sites {
        if let Some(op) = diff_site(from.get(site), to.get(site)) {
            diff.insert(site, op);
        }
    }
    (!diff.is_empty()).then_some(DiffOp::Diff(diff))
}

fn parse_badges(values: Vec<Value>, path: &str) -> DiffResult<Vec<ItemId>> {
    values
        .into_iter()
        .map(|v| {
            v.as_str()
                .and_then(|s| s.parse::<ItemId>().ok())
                .ok_or_else(|| DiffError::malformed(path, format!("invalid badge {v}")))
        })
        .collect()
}

fn patch_site(
    list: &mut SiteLinkList,
    site: &str,
    op: &DiffOp,
    mode: PatchMode,
    path: &str,
) -> DiffResult<()> {
    let current = list.get(site).cloned();

    let (name_op, badges_diff) = match op {
        DiffOp::Diff(nested) => {
            if let Some(key) = nested.keys().find(|k| *k != NAME && *k != BADGES) {
                return Err(DiffError::unsupported(format!("{path}/{key}")));
            }
            let badges = match nested.get(BADGES) {
                Some(DiffOp::Diff(badges)) => Some(badges),
                Some(_) => {
                    return Err(DiffError::malformed(
                        format!("{path}/{BADGES}"),
                        "expected a list diff",
                    ))
                }
                None => None,
            };
            (nested.get(NAME), badges)
        }
        atomic => (Some(atomic), None),
    };

    let page_name = match name_op {
        Some(op) => apply_field(
            page(current.as_ref()).as_ref(),
            op,
            mode,
            &format!("{path}/{NAME}"),
        )?,
        None => page(current.as_ref()),
    };
    let Some(page_name) = page_name else {
        list.remove_by_site(site);
        return Ok(());
    };
    let page_name = page_name
        .as_str()
        .ok_or_else(|| DiffError::malformed(path, "page name is not a string"))?
        .to_string();

    let mut badges = badge_values(current.as_ref());
    if let Some(badges_diff) = badges_diff {
        apply_set(&mut badges, badges_diff, mode, &format!("{path}/{BADGES}"))?;
    }
    let badges = parse_badges(badges, path)?;

    list.set(SiteLink::new(site, page_name, badges)?);
    Ok(())
}

/// Apply a `sitelink` operation to a sitelink list.
pub fn patch_sitelinks(list: &mut SiteLinkList, op: &DiffOp, mode: PatchMode) -> DiffResult<()> {
    let DiffOp::Diff(diff) = op else {
        return Err(DiffError::malformed(SITELINK, "expected a nested diff"));
    };
    if !diff.is_assoc() {
        return Err(DiffError::malformed(SITELINK, "expected a keyed diff"));
    }
    for (site, op) in diff.entries() {
        let path = format!("{SITELINK}/{site}");
        // A nested diff without a name `Add` needs an existing link.
        let needs_link = match op {
            DiffOp::Diff(nested) => !matches!(nested.get(NAME), Some(DiffOp::Add(_))),
            _ => false,
        };
        if needs_link && !list.has_link_with_site(site) {
            if mode == PatchMode::Strict {
                return Err(DiffError::StaleDiff { path });
            }
            continue;
        }
        patch_site(list, site, op, mode, &path)?;
    }
    Ok(())
}
