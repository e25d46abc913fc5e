//! Alias groups: several alternative names per language.

use std::collections::{BTreeMap, HashSet};

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::language::validate_language_code;

/// Aliases for one language.
///
/// Duplicates and empty strings are removed on construction, keeping the
/// first occurrence. Two groups are equal when they hold the same language and
/// the same set of aliases; alias order is kept for display but carries no
/// meaning.
#[derive(Clone, Debug, Eq)]
pub struct AliasGroup {
    language: String,
    aliases: Vec<String>,
}

impl AliasGroup {
    pub fn new<I, S>(language: impl Into<String>, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let language = language.into();
        validate_language_code(&language)?;

        let mut seen = HashSet::new();
        let aliases = aliases
            .into_iter()
            .map(Into::into)
            .filter(|alias: &String| !alias.is_empty() && seen.insert(alias.clone()))
            .collect();

        Ok(Self { language, aliases })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }
}

impl PartialEq for AliasGroup {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
            && self.aliases.len() == other.aliases.len()
            && self.aliases.iter().all(|a| other.contains(a))
    }
}

/// At most one [`AliasGroup`] per language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasGroupList {
    groups: BTreeMap<String, AliasGroup>,
}

impl AliasGroupList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the aliases for `language`. An empty list removes the group.
    pub fn set_group<I, S>(&mut self, language: &str, aliases: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = AliasGroup::new(language, aliases)?;
        self.set(group);
        Ok(())
    }

    /// Insert or replace a group. An empty group removes the language.
    pub fn set(&mut self, group: AliasGroup) {
        if group.is_empty() {
            self.groups.remove(&group.language);
        } else {
            self.groups.insert(group.language.clone(), group);
        }
    }

    pub fn get(&self, language: &str) -> Option<&AliasGroup> {
        self.groups.get(language)
    }

    /// Aliases for `language`, or an empty slice.
    pub fn aliases(&self, language: &str) -> &[String] {
        self.groups
            .get(language)
            .map(|g| g.aliases.as_slice())
            .unwrap_or_default()
    }

    pub fn remove_by_language(&mut self, language: &str) -> Option<AliasGroup> {
        self.groups.remove(language)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasGroup> {
        self.groups.values()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

impl FromIterator<AliasGroup> for AliasGroupList {
    fn from_iter<I: IntoIterator<Item = AliasGroup>>(iter: I) -> Self {
        let mut list = Self::new();
        for group in iter {
            list.set(group);
        }
        list
    }
}

/// Serializes as `{"en": ["kitty", "feline"]}`.
impl Serialize for AliasGroupList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (language, group) in &self.groups {
            map.serialize_entry(language, &group.aliases)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AliasGroupList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        let mut list = AliasGroupList::new();
        for (language, aliases) in raw {
            list.set_group(&language, aliases)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicates_removed_keeping_first_occurrence() {
        let group = AliasGroup::new("en", ["kitty", "feline", "kitty", "", "puss"]).unwrap();
        assert_eq!(group.aliases(), ["kitty", "feline", "puss"]);
    }

    #[test]
    fn empty_aliases_remove_group() {
        let mut list = AliasGroupList::new();
        list.set_group("en", ["kitty"]).unwrap();
        assert_eq!(list.len(), 1);
        list.set_group("en", Vec::<String>::new()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn equality_ignores_alias_order() {
        let a = AliasGroup::new("en", ["kitty", "feline"]).unwrap();
        let b = AliasGroup::new("en", ["feline", "kitty"]).unwrap();
        let c = AliasGroup::new("en", ["feline", "tomcat"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn aliases_of_missing_language_are_empty() {
        let list = AliasGroupList::new();
        assert!(list.aliases("en").is_empty());
    }

    #[test]
    fn invalid_language_rejected() {
        assert!(AliasGroup::new("", ["x"]).is_err());
    }

    proptest::proptest! {
        #[test]
        fn group_never_holds_duplicates_or_empties(
            aliases in proptest::collection::vec("[a-c]{0,2}", 0..12)
        ) {
            let group = AliasGroup::new("en", aliases.clone()).unwrap();
            let unique: HashSet<&String> = group.aliases().iter().collect();
            proptest::prop_assert_eq!(unique.len(), group.len());
            proptest::prop_assert!(group
                .aliases()
                .iter()
                .all(|a| !a.is_empty() && aliases.contains(a)));
        }
    }

    #[test]
    fn serializes_as_string_lists() {
        let mut list = AliasGroupList::new();
        list.set_group("en", ["kitty", "feline"]).unwrap();
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value, json!({"en": ["kitty", "feline"]}));

        let parsed: AliasGroupList = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, list);
        assert_eq!(parsed.aliases("en"), ["kitty", "feline"]);
    }
}
