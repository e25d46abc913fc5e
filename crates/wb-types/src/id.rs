use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypeError};

/// Entity type tags of the built-in entity types.
pub mod entity_type {
    pub const ITEM: &str = "item";
    pub const PROPERTY: &str = "property";
    pub const ONE_STRING: &str = "one-string";
    pub const PHRASE: &str = "phrase";
}

/// Generic entity identifier: an entity type tag plus the serialization that
/// type's grammar accepts (`Q42`, `P31`, ...).
///
/// Equality and ordering consider both parts. Typed ids ([`ItemId`],
/// [`PropertyId`], ...) convert into an `EntityId` and back.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    entity_type: String,
    serialization: String,
}

impl EntityId {
    /// Build an id without grammar checks. Use a typed id or the entity type
    /// registry to parse untrusted input.
    pub fn new(entity_type: impl Into<String>, serialization: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            serialization: serialization.into(),
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn serialization(&self) -> &str {
        &self.serialization
    }

    /// Fail with [`TypeError::TypeMismatch`] unless this id has `expected` type.
    pub fn expect_type(&self, expected: &str) -> Result<()> {
        if self.entity_type == expected {
            Ok(())
        } else {
            Err(TypeError::TypeMismatch {
                expected: expected.to_string(),
                actual: self.entity_type.clone(),
            })
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialization)
    }
}

/// Parse `<prefix><positive integer without leading zeros>`.
fn parse_numeric(prefix: char, entity_type: &str, s: &str) -> Result<u64> {
    let invalid = || TypeError::InvalidEntityId {
        entity_type: entity_type.to_string(),
        serialization: s.to_string(),
    };
    let digits = s.strip_prefix(prefix).ok_or_else(invalid)?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    digits.parse::<u64>().map_err(|_| invalid())
}

macro_rules! typed_id_conversions {
    ($ty:ident, $entity_type:expr) => {
        impl From<$ty> for EntityId {
            fn from(id: $ty) -> Self {
                EntityId::new($entity_type, id.to_string())
            }
        }

        impl From<&$ty> for EntityId {
            fn from(id: &$ty) -> Self {
                EntityId::new($entity_type, id.to_string())
            }
        }

        impl TryFrom<&EntityId> for $ty {
            type Error = TypeError;

            fn try_from(id: &EntityId) -> Result<Self> {
                id.expect_type($entity_type)?;
                id.serialization.parse()
            }
        }

        impl TryFrom<EntityId> for $ty {
            type Error = TypeError;

            fn try_from(id: EntityId) -> Result<Self> {
                $ty::try_from(&id)
            }
        }
    };
}

/// Item identifier, `Q` followed by a positive number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(u64);

impl ItemId {
    pub const PREFIX: char = 'Q';

    /// Create from a positive number.
    pub fn new(number: u64) -> Result<Self> {
        if number == 0 {
            return Err(TypeError::InvalidEntityId {
                entity_type: entity_type::ITEM.into(),
                serialization: "Q0".into(),
            });
        }
        Ok(Self(number))
    }

    pub fn number(&self) -> u64 {
        self.0
    }

    pub fn is_valid(s: &str) -> bool {
        parse_numeric(Self::PREFIX, entity_type::ITEM, s).is_ok()
    }
}

impl FromStr for ItemId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_numeric(Self::PREFIX, entity_type::ITEM, s).map(Self)
    }
}

impl TryFrom<String> for ItemId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({self})")
    }
}

typed_id_conversions!(ItemId, entity_type::ITEM);

/// Property identifier, `P` followed by a positive number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId(u64);

impl PropertyId {
    pub const PREFIX: char = 'P';

    pub fn new(number: u64) -> Result<Self> {
        if number == 0 {
            return Err(TypeError::InvalidEntityId {
                entity_type: entity_type::PROPERTY.into(),
                serialization: "P0".into(),
            });
        }
        Ok(Self(number))
    }

    pub fn number(&self) -> u64 {
        self.0
    }

    pub fn is_valid(s: &str) -> bool {
        parse_numeric(Self::PREFIX, entity_type::PROPERTY, s).is_ok()
    }
}

impl FromStr for PropertyId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_numeric(Self::PREFIX, entity_type::PROPERTY, s).map(Self)
    }
}

impl TryFrom<String> for PropertyId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PropertyId> for String {
    fn from(id: PropertyId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({self})")
    }
}

typed_id_conversions!(PropertyId, entity_type::PROPERTY);

/// Identifier of a one-string entity: ASCII letters and digits, not starting
/// with `0`. Matching is case-insensitive; the stored form is lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OneStringId(String);

impl OneStringId {
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty()
            && !s.starts_with('0')
            && s.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    /// Generate a random id from 16 random bytes, hex encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        // A leading zero nibble would not match the id grammar.
        if bytes[0] < 0x10 {
            bytes[0] |= 0x10;
        }
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OneStringId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        if Self::is_valid(s) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(TypeError::InvalidEntityId {
                entity_type: entity_type::ONE_STRING.into(),
                serialization: s.to_string(),
            })
        }
    }
}

impl fmt::Display for OneStringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

typed_id_conversions!(OneStringId, entity_type::ONE_STRING);

/// Identifier of a phrase entity: any non-empty string without whitespace
/// or `/`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhraseId(String);

impl PhraseId {
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '/')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhraseId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(TypeError::InvalidEntityId {
                entity_type: entity_type::PHRASE.into(),
                serialization: s.to_string(),
            })
        }
    }
}

impl fmt::Display for PhraseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

typed_id_conversions!(PhraseId, entity_type::PHRASE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_parse_and_display() {
        let id: ItemId = "Q42".parse().unwrap();
        assert_eq!(id.number(), 42);
        assert_eq!(id.to_string(), "Q42");
    }

    #[test]
    fn item_id_rejects_bad_input() {
        for bad in ["", "Q", "Q0", "Q042", "q42", "P42", "Q4a", "X123"] {
            assert!(bad.parse::<ItemId>().is_err(), "{bad} should be rejected");
        }
        assert!(ItemId::new(0).is_err());
    }

    #[test]
    fn property_id_roundtrip_through_entity_id() {
        let id: PropertyId = "P31".parse().unwrap();
        let generic = EntityId::from(id);
        assert_eq!(generic.entity_type(), entity_type::PROPERTY);
        assert_eq!(generic.serialization(), "P31");
        assert_eq!(PropertyId::try_from(&generic).unwrap(), id);
    }

    #[test]
    fn conversion_from_other_type_is_mismatch() {
        let generic = EntityId::from(ItemId::new(5).unwrap());
        assert_eq!(
            PropertyId::try_from(&generic),
            Err(TypeError::TypeMismatch {
                expected: "property".into(),
                actual: "item".into()
            })
        );
    }

    #[test]
    fn entity_id_equality_includes_type() {
        let a = EntityId::new("item", "x1");
        let b = EntityId::new("one-string", "x1");
        assert_ne!(a, b);
        assert_eq!(a, EntityId::new("item", "x1"));
    }

    #[test]
    fn one_string_ids() {
        assert!(OneStringId::is_valid("abc123"));
        assert!(OneStringId::is_valid("ABC"));
        assert!(!OneStringId::is_valid("0abc"));
        assert!(!OneStringId::is_valid("ab-c"));
        assert!(!OneStringId::is_valid(""));
        let parsed: OneStringId = "ABC".parse().unwrap();
        assert_eq!(parsed.as_str(), "abc");
    }

    #[test]
    fn generated_one_string_ids_are_valid_and_unique() {
        let a = OneStringId::generate();
        let b = OneStringId::generate();
        assert_eq!(a.as_str().len(), 32);
        assert!(OneStringId::is_valid(a.as_str()));
        assert_ne!(a, b);
    }

    #[test]
    fn phrase_ids() {
        assert!(PhraseId::is_valid("hello-world"));
        assert!(!PhraseId::is_valid("hello world"));
        assert!(!PhraseId::is_valid("a/b"));
        assert!(!PhraseId::is_valid(""));
    }

    #[test]
    fn item_id_serde_as_string() {
        let id = ItemId::new(999).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Q999\"");
        let parsed: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<ItemId>("\"P1\"").is_err());
    }
}
