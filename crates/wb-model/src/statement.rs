//! Statements: property-value claims with qualifiers, references and a rank.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use wb_types::{EntityId, PropertyId};

/// A typed value, serialized as `{"type": "string", "value": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataValue {
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: Value,
}

impl DataValue {
    pub fn new(value_type: impl Into<String>, value: Value) -> Self {
        Self {
            value_type: value_type.into(),
            value,
        }
    }

    /// A plain `string` data value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::new("string", Value::String(s.into()))
    }
}

/// A property-value pair, or a claim that some/no value exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "snaktype", rename_all = "lowercase")]
pub enum Snak {
    Value {
        property: PropertyId,
        datavalue: DataValue,
    },
    SomeValue {
        property: PropertyId,
    },
    NoValue {
        property: PropertyId,
    },
}

impl Snak {
    pub fn property(&self) -> PropertyId {
        match self {
            Self::Value { property, .. }
            | Self::SomeValue { property }
            | Self::NoValue { property } => *property,
        }
    }
}

/// A source backing a statement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub snaks: Vec<Snak>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Deprecated,
    #[default]
    Normal,
    Preferred,
}

/// A claim about an entity.
///
/// The GUID is optional: statements built in memory may not have one until
/// they are saved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(rename = "mainsnak")]
    pub main_snak: Snak,
    #[serde(default)]
    pub qualifiers: Vec<Snak>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub rank: Rank,
}

impl Statement {
    pub fn new(main_snak: Snak) -> Self {
        Self {
            guid: None,
            main_snak,
            qualifiers: Vec::new(),
            references: Vec::new(),
            rank: Rank::Normal,
        }
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_qualifier(mut self, snak: Snak) -> Self {
        self.qualifiers.push(snak);
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// The property of the main snak.
    pub fn property_id(&self) -> PropertyId {
        self.main_snak.property()
    }

    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }
}

/// Generates statement GUIDs of the form `Q42$F078E5B3-F9A8-480E-B7AC-D97778CBBEF9`.
#[derive(Clone, Debug)]
pub struct StatementGuidGenerator {
    entity_id: EntityId,
}

impl StatementGuidGenerator {
    pub fn new(entity_id: EntityId) -> Self {
        Self { entity_id }
    }

    pub fn new_guid(&self) -> String {
        format!(
            "{}${}",
            self.entity_id.serialization(),
            Uuid::new_v4().hyphenated().to_string().to_uppercase()
        )
    }

    /// Split a GUID into its entity id serialization and its random part.
    pub fn split(guid: &str) -> Option<(&str, &str)> {
        guid.split_once('$')
            .filter(|(entity, rest)| !entity.is_empty() && !rest.is_empty())
    }
}

/// The statements of an entity, in display order.
///
/// Equality ignores order: two lists are equal when they contain the same
/// statements the same number of times.
#[derive(Clone, Debug, Default, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementList {
    statements: Vec<Statement>,
}

impl StatementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn get_by_guid(&self, guid: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.guid() == Some(guid))
    }

    pub fn get_by_guid_mut(&mut self, guid: &str) -> Option<&mut Statement> {
        self.statements.iter_mut().find(|s| s.guid() == Some(guid))
    }

    /// Replace the statement with the same GUID, or append it.
    pub fn set(&mut self, statement: Statement) {
        let existing = statement
            .guid()
            .and_then(|guid| self.statements.iter().position(|s| s.guid() == Some(guid)));
        match existing {
            Some(index) => self.statements[index] = statement,
            None => self.statements.push(statement),
        }
    }

    pub fn remove_by_guid(&mut self, guid: &str) -> Option<Statement> {
        let index = self.statements.iter().position(|s| s.guid() == Some(guid))?;
        Some(self.statements.remove(index))
    }

    /// Remove the first statement equal to `statement`. Returns `true` if one
    /// was removed.
    pub fn remove_first_equal(&mut self, statement: &Statement) -> bool {
        match self.statements.iter().position(|s| s == statement) {
            Some(index) => {
                self.statements.remove(index);
                true
            }
            None => false,
        }
    }

    /// Statements grouped by main snak property, each group in list order.
    pub fn by_property(&self) -> BTreeMap<PropertyId, Vec<&Statement>> {
        let mut groups: BTreeMap<PropertyId, Vec<&Statement>> = BTreeMap::new();
        for statement in &self.statements {
            groups.entry(statement.property_id()).or_default().push(statement);
        }
        groups
    }

    pub fn property_ids(&self) -> Vec<PropertyId> {
        self.by_property().into_keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl PartialEq for StatementList {
    fn eq(&self, other: &Self) -> bool {
        if self.statements.len() != other.statements.len() {
            return false;
        }
        let count = |list: &[Statement], s: &Statement| list.iter().filter(|x| *x == s).count();
        self.statements
            .iter()
            .all(|s| count(&self.statements, s) == count(&other.statements, s))
    }
}

impl FromIterator<Statement> for StatementList {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}
