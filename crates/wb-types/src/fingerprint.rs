use crate::alias::{AliasGroup, AliasGroupList};
use crate::error::Result;
use crate::term::{Term, TermList};

/// The label/description/alias bundle owned by an entity.
///
/// The `set_*` methods are the only way to change a fingerprint. An empty text
/// or an empty alias list removes the corresponding entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fingerprint {
    labels: TermList,
    descriptions: TermList,
    alias_groups: AliasGroupList,
}

impl Fingerprint {
    pub fn new(labels: TermList, descriptions: TermList, alias_groups: AliasGroupList) -> Self {
        Self {
            labels,
            descriptions,
            alias_groups,
        }
    }

    /// A fingerprint with labels only.
    pub fn with_labels(labels: TermList) -> Self {
        Self {
            labels,
            ..Self::default()
        }
    }

    pub fn labels(&self) -> &TermList {
        &self.labels
    }

    pub fn descriptions(&self) -> &TermList {
        &self.descriptions
    }

    pub fn alias_groups(&self) -> &AliasGroupList {
        &self.alias_groups
    }

    pub fn label(&self, language: &str) -> Option<&Term> {
        self.labels.get(language)
    }

    pub fn description(&self, language: &str) -> Option<&Term> {
        self.descriptions.get(language)
    }

    pub fn alias_group(&self, language: &str) -> Option<&AliasGroup> {
        self.alias_groups.get(language)
    }

    pub fn set_label(&mut self, language: &str, text: &str) -> Result<()> {
        self.labels.set_term(language, text)
    }

    pub fn set_description(&mut self, language: &str, text: &str) -> Result<()> {
        self.descriptions.set_term(language, text)
    }

    pub fn set_aliases<I, S>(&mut self, language: &str, aliases: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alias_groups.set_group(language, aliases)
    }

    pub fn remove_label(&mut self, language: &str) -> Option<Term> {
        self.labels.remove_by_language(language)
    }

    pub fn remove_description(&mut self, language: &str) -> Option<Term> {
        self.descriptions.remove_by_language(language)
    }

    pub fn remove_aliases(&mut self, language: &str) -> Option<AliasGroup> {
        self.alias_groups.remove_by_language(language)
    }

    pub fn set_labels(&mut self, labels: TermList) {
        self.labels = labels;
    }

    pub fn set_descriptions(&mut self, descriptions: TermList) {
        self.descriptions = descriptions;
    }

    pub fn set_alias_groups(&mut self, alias_groups: AliasGroupList) {
        self.alias_groups = alias_groups;
    }

    /// True iff labels, descriptions and aliases are all empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.descriptions.is_empty() && self.alias_groups.is_empty()
    }
}
