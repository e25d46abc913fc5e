use std::any::Any;
use std::fmt;

use wb_types::{EntityId, Fingerprint};

use crate::error::{ModelError, Result};
use crate::sitelink::SiteLinkList;
use crate::statement::StatementList;

/// The optional capabilities an entity type declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub fingerprint: bool,
    pub statements: bool,
    pub sitelinks: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        fingerprint: false,
        statements: false,
        sitelinks: false,
    };

    /// Capabilities actually exposed by `entity`.
    pub fn of(entity: &dyn EntityDocument) -> Self {
        Self {
            fingerprint: entity.fingerprint().is_some(),
            statements: entity.statements().is_some(),
            sitelinks: entity.sitelinks().is_some(),
        }
    }
}

/// A uniquely identified structured-data document.
///
/// The trait is object-safe and `Send + Sync` so documents can be handled as
/// `Box<dyn EntityDocument>` by the type-dispatching services. Capability
/// accessors return `None` for types that do not carry the capability.
pub trait EntityDocument: fmt::Debug + Send + Sync + 'static {
    /// The constant type tag of the concrete variant (`item`, `phrase`, ...).
    fn entity_type(&self) -> &'static str;

    /// The id, or `None` before the entity was first saved.
    fn id(&self) -> Option<EntityId>;

    /// Set the id. Fails with [`ModelError::TypeMismatch`] for an id of another
    /// entity type and with [`ModelError::Type`] for an id that does not match
    /// the type's grammar.
    fn set_id(&mut self, id: EntityId) -> Result<()>;

    /// True iff every declared capability and field is empty.
    fn is_empty(&self) -> bool;

    /// Structural equality. Ids are not compared.
    fn equals(&self, other: &dyn EntityDocument) -> bool;

    /// Deep, independent copy.
    fn copy(&self) -> Box<dyn EntityDocument>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn fingerprint(&self) -> Option<&Fingerprint> {
        None
    }

    fn fingerprint_mut(&mut self) -> Option<&mut Fingerprint> {
        None
    }

    fn statements(&self) -> Option<&StatementList> {
        None
    }

    fn statements_mut(&mut self) -> Option<&mut StatementList> {
        None
    }

    fn sitelinks(&self) -> Option<&SiteLinkList> {
        None
    }

    fn sitelinks_mut(&mut self) -> Option<&mut SiteLinkList> {
        None
    }
}

impl Clone for Box<dyn EntityDocument> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// Borrow `entity` as the concrete type `T`, failing with
/// [`ModelError::TypeMismatch`].
pub fn downcast<'a, T: EntityDocument>(
    entity: &'a dyn EntityDocument,
    expected: &str,
) -> Result<&'a T> {
    entity
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ModelError::type_mismatch(expected, entity.entity_type()))
}

/// Mutable variant of [`downcast`].
pub fn downcast_mut<'a, T: EntityDocument>(
    entity: &'a mut dyn EntityDocument,
    expected: &str,
) -> Result<&'a mut T> {
    let actual = entity.entity_type();
    entity
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or_else(|| ModelError::type_mismatch(expected, actual))
}
