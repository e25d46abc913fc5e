//! Diff and patch of statement lists.
//!
//! The `claim` diff maps property ids to a keyed diff of that property's
//! statements. Statements with a GUID are keyed by it. Statements without one
//! cancel out when an equal statement exists on the other side; the rest are
//! keyed `~0`, `~1`, ... within the property group.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wb_model::{Statement, StatementList};
use wb_types::PropertyId;

use crate::diff::{Diff, DiffOp};
use crate::error::{DiffError, DiffResult};
use crate::ops::{apply_field, PatchMode};

pub const CLAIM: &str = "claim";

const UNKEYED_PREFIX: char = '~';

fn to_value<T: Serialize>(value: &T, path: &str) -> DiffResult<Value> {
    serde_json::to_value(value).map_err(|e| DiffError::malformed(path, e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: &Value, path: &str) -> DiffResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| DiffError::malformed(path, e.to_string()))
}

/// Changed sub-fields of two statements with the same GUID.
fn diff_statement(from: &Statement, to: &Statement, path: &str) -> DiffResult<Diff> {
    let mut diff = Diff::new();
    if from.main_snak != to.main_snak {
        diff.insert(
            "mainsnak",
            DiffOp::change(to_value(&from.main_snak, path)?, to_value(&to.main_snak, path)?),
        );
    }
    if from.qualifiers != to.qualifiers {
        diff.insert(
            "qualifiers",
            DiffOp::change(to_value(&from.qualifiers, path)?, to_value(&to.qualifiers, path)?),
        );
    }
    if from.references != to.references {
        diff.insert(
            "references",
            DiffOp::change(to_value(&from.references, path)?, to_value(&to.references, path)?),
        );
    }
    if from.rank != to.rank {
        diff.insert(
            "rank",
            DiffOp::change(to_value(&from.rank, path)?, to_value(&to.rank, path)?),
        );
    }
    Ok(diff)
}

fn diff_group(from: &[&Statement], to: &[&Statement], path: &str) -> DiffResult<Diff> {
    let mut diff = Diff::new();

    let from_keyed: BTreeMap<&str, &Statement> = from
        .iter()
        .copied()
        .filter_map(|s| s.guid().map(|g| (g, s)))
        .collect();
    let to_keyed: BTreeMap<&str, &Statement> = to
        .iter()
        .copied()
        .filter_map(|s| s.guid().map(|g| (g, s)))
        .collect();

    for (guid, old) in &from_keyed {
        let op = match to_keyed.get(guid) {
            None => DiffOp::Remove(to_value(*old, path)?),
            Some(new) => DiffOp::Diff(diff_statement(old, new, &format!("{path}/{guid}"))?),
        };
        diff.insert(*guid, op);
    }
    for (guid, new) in &to_keyed {
        if !from_keyed.contains_key(guid) {
            diff.insert(*guid, DiffOp::Add(to_value(*new, path)?));
        }
    }

    let mut removed: Vec<&Statement> = from.iter().copied().filter(|s| s.guid().is_none()).collect();
    let mut added = Vec::new();
    for statement in to.iter().copied().filter(|s| s.guid().is_none()) {
        match removed.iter().position(|s| *s == statement) {
            Some(index) => {
                removed.remove(index);
            }
            None => added.push(statement),
        }
    }
    let mut counter = 0;
    for statement in removed {
        diff.insert(
            format!("{UNKEYED_PREFIX}{counter}"),
            DiffOp::Remove(to_value(statement, path)?),
        );
        counter += 1;
    }
    for statement in added {
        diff.insert(
            format!("{UNKEYED_PREFIX}{counter}"),
            DiffOp::Add(to_value(statement, path)?),
        );
        counter += 1;
    }

    Ok(diff)
}

/// The `claim` operation for two statement lists, or `None` when they hold
/// the same statements.
pub fn diff_statements(from: &StatementList, to: &StatementList) -> DiffResult<Option<DiffOp>> {
    let from_groups = from.by_property();
    let to_groups = to.by_property();
    let properties: BTreeSet<PropertyId> =
        from_groups.keys().chain(to_groups.keys()).copied().collect();

    let mut diff = Diff::new();
    for property in properties {
        let key = property.to_string();
        let path = format!("{CLAIM}/{key}");
        let empty = Vec::new();
        let group = diff_group(
            from_groups.get(&property).unwrap_or(&empty),
            to_groups.get(&property).unwrap_or(&empty),
            &path,
        )?;
        diff.insert(key, DiffOp::Diff(group));
    }

    Ok((!diff.is_empty()).then_some(DiffOp::Diff(diff)))
}

fn patch_statement_fields(
    statement: &mut Statement,
    diff: &Diff,
    mode: PatchMode,
    path: &str,
) -> DiffResult<()> {
    for (field, op) in diff.entries() {
        let field_path = format!("{path}/{field}");
        match field {
            "mainsnak" => {
                let current = to_value(&statement.main_snak, &field_path)?;
                if let Some(new) = apply_field(Some(&current), op, mode, &field_path)? {
                    statement.main_snak = from_value(&new, &field_path)?;
                }
            }
            "qualifiers" => {
                let current = to_value(&statement.qualifiers, &field_path)?;
                statement.qualifiers = match apply_field(Some(&current), op, mode, &field_path)? {
                    Some(new) => from_value(&new, &field_path)?,
                    None => Vec::new(),
                };
            }
            "references" => {
                let current = to_value(&statement.references, &field_path)?;
                statement.references = match apply_field(Some(&current), op, mode, &field_path)? {
                    Some(new) => from_value(&new, &field_path)?,
                    None => Vec::new(),
                };
            }
            "rank" => {
                let current = to_value(&statement.rank, &field_path)?;
                statement.rank = match apply_field(Some(&current), op, mode, &field_path)? {
                    Some(new) => from_value(&new, &field_path)?,
                    None => Default::default(),
                };
            }
            other => return Err(DiffError::unsupported(format!("{path}/{other}"))),
        }
    }
    Ok(())
}

fn remove_statement(
    list: &mut StatementList,
    key: &str,
    old: &Value,
    mode: PatchMode,
    path: &str,
) -> DiffResult<()> {
    let old: Statement = from_value(old, path)?;
    let stale = || DiffError::StaleDiff {
        path: path.to_string(),
    };

    if key.starts_with(UNKEYED_PREFIX) {
        if !list.remove_first_equal(&old) && mode == PatchMode::Strict {
            return Err(stale());
        }
        return Ok(());
    }

    let matches = list.get_by_guid(key).is_some_and(|current| *current == old);
    if !matches && mode == PatchMode::Strict {
        return Err(stale());
    }
    list.remove_by_guid(key);
    Ok(())
}

fn add_statement(
    list: &mut StatementList,
    property: PropertyId,
    key: &str,
    new: &Value,
    mode: PatchMode,
    path: &str,
) -> DiffResult<()> {
    let mut statement: Statement = from_value(new, path)?;
    if statement.property_id() != property {
        return Err(DiffError::malformed(
            path,
            format!("statement for {} filed under {property}", statement.property_id()),
        ));
    }

    if key.starts_with(UNKEYED_PREFIX) {
        statement.guid = None;
        list.add(statement);
        return Ok(());
    }

    statement.guid = Some(key.to_string());
    let conflicting = list
        .get_by_guid(key)
        .is_some_and(|current| *current != statement);
    if conflicting && mode == PatchMode::Strict {
        return Err(DiffError::Conflict {
            path: path.to_string(),
        });
    }
    list.set(statement);
    Ok(())
}

/// Apply a `claim` operation to a statement list.
///
/// Removals and in-place changes are applied before additions so a statement
/// that moved to another property is removed before it is re-added.
pub fn patch_statements(list: &mut StatementList, op: &DiffOp, mode: PatchMode) -> DiffResult<()> {
    let DiffOp::Diff(diff) = op else {
        return Err(DiffError::malformed(CLAIM, "expected a nested diff"));
    };
    if !diff.is_assoc() {
        return Err(DiffError::malformed(CLAIM, "expected a keyed diff"));
    }

    let mut additions = Vec::new();
    for (property_key, group_op) in diff.entries() {
        let group_path = format!("{CLAIM}/{property_key}");
        let property: PropertyId = property_key
            .parse()
            .map_err(|_| DiffError::malformed(group_path.as_str(), "not a property id"))?;
        let DiffOp::Diff(group) = group_op else {
            return Err(DiffError::malformed(group_path, "expected a nested diff"));
        };

        for (key, op) in group.entries() {
            let path = format!("{group_path}/{key}");
            match op {
                DiffOp::Remove(old) => remove_statement(list, key, old, mode, &path)?,
                DiffOp::Add(new) => additions.push((property, key, new, path)),
                DiffOp::Diff(fields) => match list.get_by_guid_mut(key) {
                    Some(statement) => patch_statement_fields(statement, fields, mode, &path)?,
                    None if mode == PatchMode::Force => {}
                    None => return Err(DiffError::StaleDiff { path }),
                },
                DiffOp::Change { .. } => {
                    return Err(DiffError::malformed(path, "statements change through nested diffs"))
                }
            }
        }
    }

    let present = match mode {
        PatchMode::Strict => vec![false; additions.len()],
        PatchMode::Force => already_present(list, &additions)?,
    };
    for ((property, key, new, path), present) in additions.into_iter().zip(present) {
        if !present {
            add_statement(list, property, key, new, mode, &path)?;
        }
    }
    Ok(())
}

/// For each addition, whether an unkeyed statement it adds is already held
/// by `list`. The n-th addition of a statement counts as present when `list`
/// holds at least n equal statements without a GUID.
fn already_present(
    list: &StatementList,
    additions: &[(PropertyId, &str, &Value, String)],
) -> DiffResult<Vec<bool>> {
    let mut seen: Vec<(Statement, usize)> = Vec::new();
    let mut present = Vec::with_capacity(additions.len());
    for (_, key, new, path) in additions {
        if !key.starts_with(UNKEYED_PREFIX) {
            present.push(false);
            continue;
        }
        let mut statement: Statement = from_value(new, path)?;
        statement.guid = None;
        let nth = match seen.iter_mut().find(|(s, _)| *s == statement) {
            Some((_, count)) => {
                *count += 1;
                *count
            }
            None => {
                seen.push((statement.clone(), 1));
                1
            }
        };
        let held = list.iter().filter(|s| **s == statement).count();
        present.push(held >= nth);
    }
    Ok(present)
}
