//! Recording edits as changes and rebasing edits onto newer revisions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};
use wb_change::{ChangeStore, EntityChange, EntityChangeFactory, RevisionMetadata};
use wb_model::EntityDocument;
use wb_registry::{EntityDiffer, EntityPatcher, EntityTypeRegistry};

use crate::config::RepoConfig;
use crate::error::Result;

/// What the repository knows about a saved revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    pub revision_id: u64,
    pub timestamp: DateTime<Utc>,
    pub parent_id: u64,
    pub page_id: u64,
    pub user_id: u64,
    pub user_name: String,
    pub central_user_id: u64,
    pub bot: bool,
    pub comment: String,
}

/// Entry point for saved edits.
pub struct EditPipeline {
    registry: Arc<EntityTypeRegistry>,
    store: Arc<dyn ChangeStore>,
    config: RepoConfig,
    factory: EntityChangeFactory,
    differ: EntityDiffer,
    patcher: EntityPatcher,
}

impl EditPipeline {
    pub fn new(
        registry: Arc<EntityTypeRegistry>,
        store: Arc<dyn ChangeStore>,
        config: RepoConfig,
    ) -> Self {
        Self {
            factory: EntityChangeFactory::new(registry.clone()),
            differ: EntityDiffer::new(registry.clone()),
            patcher: EntityPatcher::new(registry.clone()),
            registry,
            store,
            config,
        }
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Turn an edit into a stored change. Null edits yield `None`.
    pub fn record_edit(
        &self,
        old: Option<&dyn EntityDocument>,
        new: Option<&dyn EntityDocument>,
        revision: RevisionInfo,
    ) -> Result<Option<EntityChange>> {
        let mut change = self.factory.new_for_entity_change(old, new)?;
        if change.is_empty() {
            debug!(
                entity = %change.entity_id(),
                revision_id = revision.revision_id,
                "null edit, no change recorded"
            );
            return Ok(None);
        }

        change.set_fields(revision.revision_id, revision.timestamp);
        change.set_metadata(RevisionMetadata {
            bot: revision.bot,
            comment: revision.comment,
            page_id: revision.page_id,
            parent_id: revision.parent_id,
        });
        change.add_user_metadata(
            revision.user_id,
            revision.user_name,
            revision.central_user_id,
        );
        self.store.save_change(&mut change)?;

        info!(
            entity = %change.entity_id(),
            change_type = %change.change_type(),
            revision_id = revision.revision_id,
            change_id = change.id(),
            "recorded entity change"
        );
        Ok(Some(change))
    }

    /// Rebase the edit `base -> mine` onto `latest`, the revision saved in
    /// the meantime. Overlapping edits fail with a conflict unless the
    /// configured mode is `force`.
    pub fn resolve_conflict(
        &self,
        base: &dyn EntityDocument,
        mine: &dyn EntityDocument,
        latest: &dyn EntityDocument,
    ) -> Result<Box<dyn EntityDocument>> {
        let diff = self.differ.diff_entities(base, mine)?;
        let merged = self
            .patcher
            .apply(latest, &diff, self.config.conflict_mode)?;
        debug!(
            entity_type = latest.entity_type(),
            ops = diff.count(),
            "rebased edit onto latest revision"
        );
        Ok(merged)
    }

    /// Apply a JSON-Patch document to `entity` with the configured term
    /// limits.
    pub fn apply_json_patch(
        &self,
        entity: &dyn EntityDocument,
        patch: &Value,
    ) -> Result<Box<dyn EntityDocument>> {
        Ok(wb_patch::patch_entity(
            &self.registry,
            entity,
            patch,
            &self.config.term_rules(),
        )?)
    }
}
