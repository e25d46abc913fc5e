//! Diff and patch of labels, descriptions and aliases.

use std::collections::BTreeMap;

use serde_json::Value;
use wb_types::{Fingerprint, TermList};

use crate::diff::{Diff, DiffOp};
use crate::error::{DiffError, DiffResult};
use crate::ops::{apply_map, apply_set, diff_maps, diff_sets, PatchMode};

pub const LABEL: &str = "label";
pub const DESCRIPTION: &str = "description";
pub const ALIASES: &str = "aliases";

fn term_map(terms: &TermList) -> BTreeMap<String, Value> {
    terms
        .iter()
        .map(|t| (t.language().to_string(), Value::String(t.text().to_string())))
        .collect()
}

fn alias_values(fingerprint: &Fingerprint, language: &str) -> Vec<Value> {
    fingerprint
        .alias_groups()
        .aliases(language)
        .iter()
        .map(|a| Value::String(a.clone()))
        .collect()
}

/// Add `label`, `description` and `aliases` operations for the differences
/// between two fingerprints.
pub fn diff_fingerprint(from: &Fingerprint, to: &Fingerprint, diff: &mut Diff) {
    diff.insert(
        LABEL,
        DiffOp::Diff(diff_maps(&term_map(from.labels()), &term_map(to.labels()))),
    );
    diff.insert(
        DESCRIPTION,
        DiffOp::Diff(diff_maps(
            &term_map(from.descriptions()),
            &term_map(to.descriptions()),
        )),
    );

    let mut aliases = Diff::new();
    let languages: std::collections::BTreeSet<&str> = from
        .alias_groups()
        .languages()
        .chain(to.alias_groups().languages())
        .collect();
    for language in languages {
        let set_diff = diff_sets(&alias_values(from, language), &alias_values(to, language));
        aliases.insert(language, DiffOp::Diff(set_diff));
    }
    diff.insert(ALIASES, DiffOp::Diff(aliases));
}

fn patch_terms(terms: &mut TermList, diff: &Diff, mode: PatchMode, path: &str) -> DiffResult<()> {
    let mut map = term_map(terms);
    apply_map(&mut map, diff, mode, path)?;

    let mut patched = TermList::new();
    for (language, value) in map {
        let text = value
            .as_str()
            .ok_or_else(|| DiffError::malformed(format!("{path}/{language}"), "term is not a string"))?;
        patched.set_term(&language, text)?;
    }
    *terms = patched;
    Ok(())
}

/// Apply the fingerprint part (`key` is one of [`LABEL`], [`DESCRIPTION`],
/// [`ALIASES`]) of an entity diff.
pub fn patch_fingerprint(
    fingerprint: &mut Fingerprint,
    key: &str,
    op: &DiffOp,
    mode: PatchMode,
) -> DiffResult<()> {
    let DiffOp::Diff(diff) = op else {
        return Err(DiffError::malformed(key, "expected a nested diff"));
    };

    match key {
        LABEL => {
            let mut labels = fingerprint.labels().clone();
            patch_terms(&mut labels, diff, mode, key)?;
            fingerprint.set_labels(labels);
        }
        DESCRIPTION => {
            let mut descriptions = fingerprint.descriptions().clone();
            patch_terms(&mut descriptions, diff, mode, key)?;
            fingerprint.set_descriptions(descriptions);
        }
        ALIASES => {
            if !diff.is_assoc() {
                return Err(DiffError::malformed(key, "expected a keyed diff"));
            }
            for (language, op) in diff.entries() {
                let path = format!("{key}/{language}");
                let DiffOp::Diff(set_diff) = op else {
                    return Err(DiffError::malformed(path, "expected a list diff"));
                };
                let mut values = alias_values(fingerprint, language);
                apply_set(&mut values, set_diff, mode, &path)?;
                let aliases = values
                    .into_iter()
                    .map(|v| match v {
                        Value::String(s) => Ok(s),
                        _ => Err(DiffError::malformed(path.as_str(), "alias is not a string")),
                    })
                    .collect::<DiffResult<Vec<String>>>()?;
                fingerprint.set_aliases(language, aliases)?;
            }
        }
        other => return Err(DiffError::unsupported(other)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_added_to_empty_fingerprint() {
        let from = Fingerprint::default();
        let mut to = Fingerprint::default();
        to.set_label("en", "cat").unwrap();

        let mut diff = Diff::new();
        diff_fingerprint(&from, &to, &mut diff);

        let mut labels = Diff::new();
        labels.insert("en", DiffOp::Add(json!("cat")));
        let mut expected = Diff::new();
        expected.insert(LABEL, DiffOp::Diff(labels));
        assert_eq!(diff, expected);

        let mut patched = from.clone();
        for (key, op) in diff.entries() {
            patch_fingerprint(&mut patched, key, op, PatchMode::Strict).unwrap();
        }
        assert_eq!(patched, to);
    }

    #[test]
    fn alias_change_is_a_set_difference() {
        let mut from = Fingerprint::default();
        from.set_aliases("en", ["kitty", "feline"]).unwrap();
        let mut to = Fingerprint::default();
        to.set_aliases("en", ["feline", "tomcat"]).unwrap();

        let mut diff = Diff::new();
        diff_fingerprint(&from, &to, &mut diff);

        let en = diff.get_diff(ALIASES).and_then(|d| d.get_diff("en")).unwrap();
        assert!(!en.is_assoc());
        let removed: Vec<_> = en.ops().filter_map(DiffOp::old_value).collect();
        let added: Vec<_> = en.ops().filter_map(DiffOp::new_value).collect();
        assert_eq!(removed, [&json!("kitty")]);
        assert_eq!(added, [&json!("tomcat")]);

        let mut patched = from.clone();
        patch_fingerprint(&mut patched, ALIASES, diff.get(ALIASES).unwrap(), PatchMode::Strict)
            .unwrap();
        assert_eq!(patched, to);
    }

    #[test]
    fn reordered_aliases_give_no_diff() {
        let mut from = Fingerprint::default();
        from.set_aliases("en", ["a", "b"]).unwrap();
        let mut to = Fingerprint::default();
        to.set_aliases("en", ["b", "a"]).unwrap();

        let mut diff = Diff::new();
        diff_fingerprint(&from, &to, &mut diff);
        assert!(diff.is_empty());
    }

    #[test]
    fn removing_all_aliases_drops_group() {
        let mut from = Fingerprint::default();
        from.set_aliases("en", ["kitty"]).unwrap();
        let to = Fingerprint::default();

        let mut diff = Diff::new();
        diff_fingerprint(&from, &to, &mut diff);
        let mut patched = from.clone();
        patch_fingerprint(&mut patched, ALIASES, diff.get(ALIASES).unwrap(), PatchMode::Strict)
            .unwrap();
        assert!(patched.is_empty());
    }

    #[test]
    fn non_string_label_is_malformed() {
        let mut labels = Diff::new();
        labels.insert("en", DiffOp::Add(json!(7)));
        let err = patch_fingerprint(
            &mut Fingerprint::default(),
            LABEL,
            &DiffOp::Diff(labels),
            PatchMode::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::Malformed { .. }));
    }

    #[test]
    fn invalid_language_in_diff_is_a_model_error() {
        let mut labels = Diff::new();
        labels.insert("Not A Code", DiffOp::Add(json!("x")));
        let err = patch_fingerprint(
            &mut Fingerprint::default(),
            LABEL,
            &DiffOp::Diff(labels),
            PatchMode::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::Model(_)));
    }
}
