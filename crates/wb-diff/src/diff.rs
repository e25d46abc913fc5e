//! Diff values and their wire format.
//!
//! A [`Diff`] is either associative (operations keyed by field path, sorted by
//! key) or a list of unkeyed operations (used for set differences such as
//! aliases and badges). Operations carry JSON values so one diff type serves
//! every entity type.
//!
//! On the wire an operation is one of
//!
//! ```json
//! {"type": "add", "newvalue": ...}
//! {"type": "remove", "oldvalue": ...}
//! {"type": "change", "oldvalue": ..., "newvalue": ...}
//! {"type": "diff", "isassoc": true, "operations": {...}}
//! ```
//!
//! and a diff is a JSON object (associative) or array (list).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single operation within a [`Diff`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireOp", try_from = "WireOp")]
pub enum DiffOp {
    Add(Value),
    Remove(Value),
    Change { old: Value, new: Value },
    Diff(Diff),
}

impl DiffOp {
    pub fn change(old: impl Into<Value>, new: impl Into<Value>) -> Self {
        Self::Change {
            old: old.into(),
            new: new.into(),
        }
    }

    /// True for a nested diff without operations at any depth.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Diff(diff) if diff.is_empty())
    }

    pub fn is_atomic(&self) -> bool {
        !matches!(self, Self::Diff(_))
    }

    /// The wire name of the operation.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Change { .. } => "change",
            Self::Diff(_) => "diff",
        }
    }

    /// The value before the operation, if any.
    pub fn old_value(&self) -> Option<&Value> {
        match self {
            Self::Remove(old) | Self::Change { old, .. } => Some(old),
            _ => None,
        }
    }

    /// The value after the operation, if any.
    pub fn new_value(&self) -> Option<&Value> {
        match self {
            Self::Add(new) | Self::Change { new, .. } => Some(new),
            _ => None,
        }
    }

    /// Number of atomic operations, counting nested ones.
    pub fn count(&self) -> usize {
        match self {
            Self::Diff(diff) => diff.count(),
            _ => 1,
        }
    }
}

/// A structural delta between two values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diff {
    Assoc(BTreeMap<String, DiffOp>),
    List(Vec<DiffOp>),
}

impl Default for Diff {
    fn default() -> Self {
        Self::Assoc(BTreeMap::new())
    }
}

impl Diff {
    /// An empty associative diff.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(ops: Vec<DiffOp>) -> Self {
        Self::List(ops)
    }

    pub fn is_assoc(&self) -> bool {
        matches!(self, Self::Assoc(_))
    }

    /// True iff there are no operations at any depth.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Assoc(ops) => ops.values().all(DiffOp::is_empty),
            Self::List(ops) => ops.iter().all(DiffOp::is_empty),
        }
    }

    /// Number of top-level operations.
    pub fn len(&self) -> usize {
        match self {
            Self::Assoc(ops) => ops.len(),
            Self::List(ops) => ops.len(),
        }
    }

    /// Number of atomic operations at any depth.
    pub fn count(&self) -> usize {
        self.ops().map(DiffOp::count).sum()
    }

    /// Insert a keyed operation. Empty nested diffs are dropped so a diff
    /// never carries structure without content. Has no effect on list diffs.
    pub fn insert(&mut self, key: impl Into<String>, op: DiffOp) {
        if op.is_empty() {
            return;
        }
        if let Self::Assoc(ops) = self {
            ops.insert(key.into(), op);
        }
    }

    /// Append an unkeyed operation. Has no effect on associative diffs.
    pub fn push(&mut self, op: DiffOp) {
        if op.is_empty() {
            return;
        }
        if let Self::List(ops) = self {
            ops.push(op);
        }
    }

    pub fn get(&self, key: &str) -> Option<&DiffOp> {
        match self {
            Self::Assoc(ops) => ops.get(key),
            Self::List(_) => None,
        }
    }

    /// The nested diff under `key`, if that operation is a diff.
    pub fn get_diff(&self, key: &str) -> Option<&Diff> {
        match self.get(key) {
            Some(DiffOp::Diff(diff)) => Some(diff),
            _ => None,
        }
    }

    /// Keys of an associative diff, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let keys: Vec<&str> = match self {
            Self::Assoc(ops) => ops.keys().map(String::as_str).collect(),
            Self::List(_) => Vec::new(),
        };
        keys.into_iter()
    }

    /// Operations in order, without keys.
    pub fn ops(&self) -> Box<dyn Iterator<Item = &DiffOp> + '_> {
        match self {
            Self::Assoc(ops) => Box::new(ops.values()),
            Self::List(ops) => Box::new(ops.iter()),
        }
    }

    /// Keyed operations of an associative diff.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DiffOp)> {
        let entries: Vec<(&str, &DiffOp)> = match self {
            Self::Assoc(ops) => ops.iter().map(|(k, op)| (k.as_str(), op)).collect(),
            Self::List(_) => Vec::new(),
        };
        entries.into_iter()
    }

    /// Number of top-level `Add` operations.
    pub fn additions(&self) -> usize {
        self.ops().filter(|op| matches!(op, DiffOp::Add(_))).count()
    }

    /// Number of top-level `Remove` operations.
    pub fn removals(&self) -> usize {
        self.ops().filter(|op| matches!(op, DiffOp::Remove(_))).count()
    }

    /// Number of top-level `Change` operations.
    pub fn changes(&self) -> usize {
        self.ops()
            .filter(|op| matches!(op, DiffOp::Change { .. }))
            .count()
    }
}

impl FromIterator<(String, DiffOp)> for Diff {
    fn from_iter<I: IntoIterator<Item = (String, DiffOp)>>(iter: I) -> Self {
        let mut diff = Diff::new();
        for (key, op) in iter {
            diff.insert(key, op);
        }
        diff
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireOp {
    Add {
        newvalue: Value,
    },
    Remove {
        oldvalue: Value,
    },
    Change {
        oldvalue: Value,
        newvalue: Value,
    },
    Diff {
        isassoc: bool,
        operations: Diff,
    },
}

impl From<DiffOp> for WireOp {
    fn from(op: DiffOp) -> Self {
        match op {
            DiffOp::Add(newvalue) => Self::Add { newvalue },
            DiffOp::Remove(oldvalue) => Self::Remove { oldvalue },
            DiffOp::Change { old, new } => Self::Change {
                oldvalue: old,
                newvalue: new,
            },
            DiffOp::Diff(operations) => Self::Diff {
                isassoc: operations.is_assoc(),
                operations,
            },
        }
    }
}

impl TryFrom<WireOp> for DiffOp {
    type Error = String;

    fn try_from(op: WireOp) -> Result<Self, String> {
        Ok(match op {
            WireOp::Add { newvalue } => Self::Add(newvalue),
            WireOp::Remove { oldvalue } => Self::Remove(oldvalue),
            WireOp::Change { oldvalue, newvalue } => Self::Change {
                old: oldvalue,
                new: newvalue,
            },
            WireOp::Diff {
                isassoc,
                operations,
            } => {
                // An empty object and an empty array both mean "no operations".
                let operations = match (isassoc, operations) {
                    (true, Diff::List(ops)) if ops.is_empty() => Diff::new(),
                    (false, Diff::Assoc(ops)) if ops.is_empty() => Diff::List(Vec::new()),
                    (isassoc, operations) if isassoc != operations.is_assoc() => {
                        return Err(format!(
                            "isassoc is {isassoc} but operations are {}",
                            if operations.is_assoc() { "keyed" } else { "a list" }
                        ));
                    }
                    (_, operations) => operations,
                };
                Self::Diff(operations)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn label_diff() -> Diff {
        let mut labels = Diff::new();
        labels.insert("en", DiffOp::Add(json!("cat")));
        labels.insert("de", DiffOp::change("Katze", "Kater"));
        let mut diff = Diff::new();
        diff.insert("label", DiffOp::Diff(labels));
        diff
    }

    #[test]
    fn emptiness_is_recursive() {
        let mut diff = Diff::new();
        assert!(diff.is_empty());
        diff.insert("label", DiffOp::Diff(Diff::new()));
        assert!(diff.is_empty());
        assert_eq!(diff.len(), 0);

        assert!(!label_diff().is_empty());
        assert_eq!(label_diff().count(), 2);
    }

    #[test]
    fn list_diffs_hold_unkeyed_ops() {
        let mut aliases = Diff::list(Vec::new());
        aliases.push(DiffOp::Remove(json!("kitty")));
        aliases.push(DiffOp::Add(json!("tomcat")));
        aliases.insert("ignored", DiffOp::Add(json!("x")));
        assert!(!aliases.is_assoc());
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.additions(), 1);
        assert_eq!(aliases.removals(), 1);
    }

    #[test]
    fn wire_format() {
        let value = serde_json::to_value(label_diff()).unwrap();
        assert_eq!(
            value,
            json!({
                "label": {
                    "type": "diff",
                    "isassoc": true,
                    "operations": {
                        "de": {"type": "change", "oldvalue": "Katze", "newvalue": "Kater"},
                        "en": {"type": "add", "newvalue": "cat"}
                    }
                }
            })
        );
        let back: Diff = serde_json::from_value(value).unwrap();
        assert_eq!(back, label_diff());
    }

    #[test]
    fn list_wire_format() {
        let op = DiffOp::Diff(Diff::list(vec![DiffOp::Remove(json!("kitty"))]));
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "diff",
                "isassoc": false,
                "operations": [{"type": "remove", "oldvalue": "kitty"}]
            })
        );
        assert_eq!(serde_json::from_value::<DiffOp>(value).unwrap(), op);
    }

    #[test]
    fn empty_nested_diff_keeps_declared_kind() {
        let op: DiffOp = serde_json::from_value(
            json!({"type": "diff", "isassoc": false, "operations": {}}),
        )
        .unwrap();
        assert_eq!(op, DiffOp::Diff(Diff::list(Vec::new())));
    }

    #[test]
    fn inconsistent_isassoc_rejected() {
        let result = serde_json::from_value::<DiffOp>(json!({
            "type": "diff",
            "isassoc": true,
            "operations": [{"type": "add", "newvalue": 1}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_op_type_rejected() {
        assert!(serde_json::from_value::<DiffOp>(json!({"type": "copy"})).is_err());
    }
}
