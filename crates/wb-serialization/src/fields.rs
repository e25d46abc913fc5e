//! Field groups shared by several serialized entity types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wb_model::{Statement, StatementList};
use wb_types::{AliasGroupList, Fingerprint, PropertyId, TermList};

use crate::error::{Result, SerializationError};

/// `labels`, `descriptions` and `aliases`. Always written, possibly empty, so
/// JSON-Patch paths like `/labels/de` resolve on any entity.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct TermFields {
    #[serde(default)]
    pub labels: TermList,
    #[serde(default)]
    pub descriptions: TermList,
    #[serde(default)]
    pub aliases: AliasGroupList,
}

impl From<&Fingerprint> for TermFields {
    fn from(fingerprint: &Fingerprint) -> Self {
        Self {
            labels: fingerprint.labels().clone(),
            descriptions: fingerprint.descriptions().clone(),
            aliases: fingerprint.alias_groups().clone(),
        }
    }
}

impl From<TermFields> for Fingerprint {
    fn from(fields: TermFields) -> Self {
        Fingerprint::new(fields.labels, fields.descriptions, fields.aliases)
    }
}

/// Statements grouped by property: `{"P31": [statement, ...]}`.
pub(crate) type Claims = BTreeMap<PropertyId, Vec<Statement>>;

pub(crate) fn claims_of(statements: &StatementList) -> Claims {
    statements
        .by_property()
        .into_iter()
        .map(|(property, group)| (property, group.into_iter().cloned().collect()))
        .collect()
}

pub(crate) fn statements_from(claims: Claims) -> Result<StatementList> {
    let mut list = StatementList::new();
    for (key, group) in claims {
        for statement in group {
            if statement.property_id() != key {
                return Err(SerializationError::StatementProperty {
                    key: key.to_string(),
                    actual: statement.property_id().to_string(),
                });
            }
            list.add(statement);
        }
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wb_model::Snak;

    #[test]
    fn statement_under_wrong_property_rejected() {
        let claims: Claims = serde_json::from_value(json!({
            "P1": [{"mainsnak": {"snaktype": "novalue", "property": "P2"}}]
        }))
        .unwrap();
        assert_eq!(
            statements_from(claims).unwrap_err(),
            SerializationError::StatementProperty {
                key: "P1".into(),
                actual: "P2".into()
            }
        );
    }

    #[test]
    fn claims_group_by_property() {
        let p = |n| PropertyId::new(n).unwrap();
        let list: StatementList = [
            Statement::new(Snak::NoValue { property: p(2) }),
            Statement::new(Snak::SomeValue { property: p(10) }),
            Statement::new(Snak::SomeValue { property: p(2) }),
        ]
        .into_iter()
        .collect();
        let claims = claims_of(&list);
        assert_eq!(claims.keys().copied().collect::<Vec<_>>(), [p(2), p(10)]);
        assert_eq!(claims[&p(2)].len(), 2);
        assert_eq!(statements_from(claims).unwrap(), list);
    }
}
