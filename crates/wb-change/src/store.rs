//! Change storage.
//!
//! [`ChangeStore`] is the storage contract the edit pipeline writes to;
//! [`InMemoryChangeStore`] keeps everything in a `HashMap` behind a `RwLock`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use wb_types::EntityId;

use crate::change::EntityChange;
use crate::error::{ChangeError, Result};

/// Storage backend for entity changes.
///
/// Saving a change without an id assigns one; saving a change that has an id
/// replaces the stored record.
pub trait ChangeStore: Send + Sync {
    fn save_change(&self, change: &mut EntityChange) -> Result<()>;

    /// The latest change recorded for a revision, if any.
    fn load_by_revision_id(&self, revision_id: u64) -> Result<Option<EntityChange>>;

    /// All changes of an entity, oldest first.
    fn load_by_entity(&self, entity_id: &EntityId) -> Result<Vec<EntityChange>>;
}

/// An in-memory implementation of [`ChangeStore`]. Data is lost when the
/// store is dropped.
#[derive(Debug)]
pub struct InMemoryChangeStore {
    changes: RwLock<HashMap<u64, EntityChange>>,
    next_id: AtomicU64,
}

impl InMemoryChangeStore {
    pub fn new() -> Self {
        Self {
            changes: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.changes.read().map(|c| c.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryChangeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> ChangeError {
    ChangeError::Storage(format!("lock poisoned: {e}"))
}

impl ChangeStore for InMemoryChangeStore {
    fn save_change(&self, change: &mut EntityChange) -> Result<()> {
        let mut changes = self.changes.write().map_err(poisoned)?;
        let id = match change.id() {
            Some(id) => id,
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                change.set_id(id);
                id
            }
        };
        changes.insert(id, change.clone());
        Ok(())
    }

    fn load_by_revision_id(&self, revision_id: u64) -> Result<Option<EntityChange>> {
        let changes = self.changes.read().map_err(poisoned)?;
        Ok(changes
            .values()
            .filter(|c| c.fields().revision_id == revision_id)
            .max_by_key(|c| c.id())
            .cloned())
    }

    fn load_by_entity(&self, entity_id: &EntityId) -> Result<Vec<EntityChange>> {
        let changes = self.changes.read().map_err(poisoned)?;
        let mut found: Vec<EntityChange> = changes
            .values()
            .filter(|c| c.entity_id() == entity_id)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.id());
        Ok(found)
    }
}
