//! Field-level diff and patch primitives shared by all entity differs.
//!
//! Maps are `BTreeMap<String, Value>` (language -> text, site -> page, ...).
//! A missing key and an empty string both count as "no value".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diff::{Diff, DiffOp};
use crate::error::{DiffError, DiffResult};

/// How a patch reacts when the entity does not match the diff's expectations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchMode {
    /// Fail with `Conflict` or `StaleDiff`.
    #[default]
    Strict,
    /// Overwrite, or skip operations whose target is gone.
    Force,
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !matches!(v, Value::Null) && v.as_str() != Some(""))
}

/// Compare one field: empty to non-empty is `Add`, non-empty to empty is
/// `Remove`, two different non-empty values are a `Change`.
pub fn diff_field(old: Option<&Value>, new: Option<&Value>) -> Option<DiffOp> {
    match (present(old), present(new)) {
        (None, Some(new)) => Some(DiffOp::Add(new.clone())),
        (Some(old), None) => Some(DiffOp::Remove(old.clone())),
        (Some(old), Some(new)) if old != new => Some(DiffOp::Change {
            old: old.clone(),
            new: new.clone(),
        }),
        _ => None,
    }
}

/// [`diff_field`] for string fields.
pub fn diff_strings(old: &str, new: &str) -> Option<DiffOp> {
    diff_field(
        Some(&Value::String(old.to_string())),
        Some(&Value::String(new.to_string())),
    )
}

/// Associative diff of two maps, one operation per differing key.
pub fn diff_maps(old: &BTreeMap<String, Value>, new: &BTreeMap<String, Value>) -> Diff {
    let mut diff = Diff::new();

    for (key, old_val) in old {
        if let Some(op) = diff_field(Some(old_val), new.get(key)) {
            diff.insert(key.clone(), op);
        }
    }

    for (key, new_val) in new {
        if !old.contains_key(key) {
            if let Some(op) = diff_field(None, Some(new_val)) {
                diff.insert(key.clone(), op);
            }
        }
    }

    diff
}

/// Set difference of two lists: `Remove` for values only in `old`, then `Add`
/// for values only in `new`. Order and duplicates are ignored.
pub fn diff_sets(old: &[Value], new: &[Value]) -> Diff {
    let mut diff = Diff::list(Vec::new());
    let mut seen = Vec::new();
    for value in old {
        if !new.contains(value) && !seen.contains(&value) {
            diff.push(DiffOp::Remove(value.clone()));
            seen.push(value);
        }
    }
    for value in new {
        if !old.contains(value) && !seen.contains(&value) {
            diff.push(DiffOp::Add(value.clone()));
            seen.push(value);
        }
    }
    diff
}

/// Apply an atomic operation to a field's current value and return the new
/// value (`None` meaning absent).
pub fn apply_field(
    current: Option<&Value>,
    op: &DiffOp,
    mode: PatchMode,
    path: &str,
) -> DiffResult<Option<Value>> {
    let current = present(current);
    match op {
        DiffOp::Add(new) => match current {
            Some(cur) if cur != new && mode == PatchMode::Strict => Err(DiffError::Conflict {
                path: path.to_string(),
            }),
            _ => Ok(Some(new.clone())),
        },
        DiffOp::Remove(old) => match current {
            Some(cur) if cur == old || mode == PatchMode::Force => Ok(None),
            None if mode == PatchMode::Force => Ok(None),
            _ => Err(DiffError::StaleDiff {
                path: path.to_string(),
            }),
        },
        DiffOp::Change { old, new } => {
            if current == Some(old) || mode == PatchMode::Force {
                Ok(Some(new.clone()))
            } else {
                Err(DiffError::StaleDiff {
                    path: path.to_string(),
                })
            }
        }
        DiffOp::Diff(_) => Err(DiffError::malformed(path, "expected an atomic operation")),
    }
}

/// Apply an associative diff of atomic operations to a map.
pub fn apply_map(
    map: &mut BTreeMap<String, Value>,
    diff: &Diff,
    mode: PatchMode,
    path: &str,
) -> DiffResult<()> {
    if !diff.is_assoc() {
        return Err(DiffError::malformed(path, "expected a keyed diff"));
    }
    for (key, op) in diff.entries() {
        let field_path = format!("{path}/{key}");
        match apply_field(map.get(key), op, mode, &field_path)? {
            Some(value) => map.insert(key.to_string(), value),
            None => map.remove(key),
        };
    }
    Ok(())
}

/// Apply a list diff to a set-like list. Adding a value already present is a
/// no-op; removing a missing value is stale in strict mode.
pub fn apply_set(
    values: &mut Vec<Value>,
    diff: &Diff,
    mode: PatchMode,
    path: &str,
) -> DiffResult<()> {
    if diff.is_assoc() && !diff.is_empty() {
        return Err(DiffError::malformed(path, "expected a list diff"));
    }
    for op in diff.ops() {
        match op {
            DiffOp::Add(value) => {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
            DiffOp::Remove(value) => match values.iter().position(|v| v == value) {
                Some(index) => {
                    values.remove(index);
                }
                None if mode == PatchMode::Force => {}
                None => {
                    return Err(DiffError::StaleDiff {
                        path: path.to_string(),
                    })
                }
            },
            _ => {
                return Err(DiffError::malformed(
                    path,
                    format!("{} operation in a list diff", op.type_name()),
                ))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_map(pairs: &[(&str, &str)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn field_rule_three_cases() {
        assert_eq!(diff_strings("", "cat"), Some(DiffOp::Add(json!("cat"))));
        assert_eq!(diff_strings("cat", ""), Some(DiffOp::Remove(json!("cat"))));
        assert_eq!(diff_strings("cat", "dog"), Some(DiffOp::change("cat", "dog")));
        assert_eq!(diff_strings("cat", "cat"), None);
        assert_eq!(diff_strings("", ""), None);
    }

    #[test]
    fn identical_maps_no_diff() {
        let map = make_map(&[("en", "cat"), ("de", "Katze")]);
        assert!(diff_maps(&map, &map).is_empty());
    }

    #[test]
    fn map_diff_covers_add_remove_change() {
        let old = make_map(&[("en", "cat"), ("de", "Katze")]);
        let new = make_map(&[("en", "cats"), ("fr", "chat")]);
        let diff = diff_maps(&old, &new);
        assert_eq!(diff.len(), 3);
        assert_eq!(diff.get("en"), Some(&DiffOp::change("cat", "cats")));
        assert_eq!(diff.get("de"), Some(&DiffOp::Remove(json!("Katze"))));
        assert_eq!(diff.get("fr"), Some(&DiffOp::Add(json!("chat"))));

        let mut patched = old.clone();
        apply_map(&mut patched, &diff, PatchMode::Strict, "label").unwrap();
        assert_eq!(patched, new);
    }

    #[test]
    fn set_diff_ignores_order() {
        let old = [json!("kitty"), json!("feline")];
        let new = [json!("feline"), json!("tomcat")];
        let diff = diff_sets(&old, &new);
        assert_eq!(
            diff,
            Diff::list(vec![DiffOp::Remove(json!("kitty")), DiffOp::Add(json!("tomcat"))])
        );
        assert!(diff_sets(&old, &[json!("feline"), json!("kitty")]).is_empty());
    }

    #[test]
    fn strict_add_conflicts_force_overwrites() {
        let current = json!("dog");
        let op = DiffOp::Add(json!("cat"));
        assert_eq!(
            apply_field(Some(&current), &op, PatchMode::Strict, "label/en"),
            Err(DiffError::Conflict {
                path: "label/en".into()
            })
        );
        assert_eq!(
            apply_field(Some(&current), &op, PatchMode::Force, "label/en").unwrap(),
            Some(json!("cat"))
        );
        assert_eq!(
            apply_field(Some(&json!("cat")), &op, PatchMode::Strict, "label/en").unwrap(),
            Some(json!("cat"))
        );
    }

    #[test]
    fn remove_of_absent_field() {
        let op = DiffOp::Remove(json!("cat"));
        assert!(matches!(
            apply_field(None, &op, PatchMode::Strict, "x"),
            Err(DiffError::StaleDiff { .. })
        ));
        assert_eq!(apply_field(None, &op, PatchMode::Force, "x").unwrap(), None);
    }

    #[test]
    fn change_with_different_current_value() {
        let op = DiffOp::change("cat", "dog");
        let current = json!("cow");
        assert!(matches!(
            apply_field(Some(&current), &op, PatchMode::Strict, "x"),
            Err(DiffError::StaleDiff { .. })
        ));
        assert_eq!(
            apply_field(Some(&current), &op, PatchMode::Force, "x").unwrap(),
            Some(json!("dog"))
        );
    }

    #[test]
    fn set_patch_removes_and_adds() {
        let mut values = vec![json!("kitty"), json!("feline")];
        let diff = diff_sets(&values.clone(), &[json!("feline"), json!("tomcat")]);
        apply_set(&mut values, &diff, PatchMode::Strict, "aliases/en").unwrap();
        assert_eq!(values, [json!("feline"), json!("tomcat")]);

        assert!(matches!(
            apply_set(&mut values, &diff, PatchMode::Strict, "aliases/en"),
            Err(DiffError::StaleDiff { .. })
        ));
        apply_set(&mut values, &diff, PatchMode::Force, "aliases/en").unwrap();
        assert_eq!(values, [json!("feline"), json!("tomcat")]);
    }

    proptest::proptest! {
        #[test]
        fn map_patch_reproduces_target(
            old in proptest::collection::btree_map("[a-d]", "[x-z]{0,2}", 0..5),
            new in proptest::collection::btree_map("[a-d]", "[x-z]{0,2}", 0..5),
        ) {
            let to_values = |m: &BTreeMap<String, String>| -> BTreeMap<String, Value> {
                m.iter()
                    .filter(|(_, v)| !v.is_empty())
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .collect()
            };
            let (old, new) = (to_values(&old), to_values(&new));
            let diff = diff_maps(&old, &new);
            proptest::prop_assert_eq!(diff.is_empty(), old == new);

            let mut patched = old.clone();
            apply_map(&mut patched, &diff, PatchMode::Strict, "m").unwrap();
            proptest::prop_assert_eq!(patched, new);
        }
    }
}
