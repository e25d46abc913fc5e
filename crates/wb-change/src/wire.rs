//! The change format propagated to subscriber wikis.
//!
//! ```json
//! {
//!   "id": 12,
//!   "entityType": "item",
//!   "entityId": "Q1",
//!   "changeType": "update",
//!   "diffOps": {"label": {"type": "diff", "isassoc": true, "operations": {..}}},
//!   "compactDiff": {"arrayFormatVersion": 1, "labelChanges": ["en"], ..},
//!   "metadata": {"revisionId": 42, "time": "20240501123005", "bot": false, ..}
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wb_diff::Diff;
use wb_registry::EntityTypeRegistry;

use crate::aspects::EntityDiffChangedAspects;
use crate::change::{
    format_timestamp, parse_timestamp, ChangeFields, ChangeMetadata, ChangeType, EntityChange,
};
use crate::error::Result;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMetadata {
    revision_id: u64,
    time: Option<String>,
    bot: bool,
    comment: String,
    user_id: u64,
    user_name: String,
    central_user_id: u64,
    page_id: u64,
    parent_id: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    /// Missing in changes written before the type was recorded. The id is
    /// then matched against the registered id patterns.
    #[serde(default)]
    entity_type: Option<String>,
    entity_id: String,
    change_type: ChangeType,
    diff_ops: Diff,
    compact_diff: EntityDiffChangedAspects,
    metadata: WireMetadata,
}

/// Converts changes to and from their wire form. Entity ids are rebuilt with
/// the id builder of the recorded entity type.
#[derive(Debug, Clone)]
pub struct ChangeCodec {
    registry: Arc<EntityTypeRegistry>,
}

impl ChangeCodec {
    pub fn new(registry: Arc<EntityTypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn serialize(&self, change: &EntityChange) -> Result<Value> {
        let fields = change.fields();
        let metadata = change.metadata();
        let wire = WireChange {
            id: change.id(),
            entity_type: Some(change.entity_id().entity_type().to_string()),
            entity_id: change.entity_id().serialization().to_string(),
            change_type: change.change_type(),
            diff_ops: change.diff().clone(),
            compact_diff: change.aspects().clone(),
            metadata: WireMetadata {
                revision_id: fields.revision_id,
                time: fields.time.as_ref().map(format_timestamp),
                bot: metadata.bot,
                comment: metadata.comment.clone(),
                user_id: metadata.user_id,
                user_name: metadata.user_name.clone(),
                central_user_id: metadata.central_user_id,
                page_id: metadata.page_id,
                parent_id: metadata.parent_id,
            },
        };
        Ok(serde_json::to_value(wire)?)
    }

    pub fn deserialize(&self, value: &Value) -> Result<EntityChange> {
        let wire: WireChange = serde_json::from_value(value.clone())?;
        let entity_id = match &wire.entity_type {
            Some(entity_type) => self.registry.build_id(entity_type, &wire.entity_id)?,
            None => self.registry.parse_id(&wire.entity_id)?,
        };
        let fields = ChangeFields {
            revision_id: wire.metadata.revision_id,
            time: wire.metadata.time.as_deref().map(parse_timestamp).transpose()?,
        };
        let metadata = ChangeMetadata {
            user_id: wire.metadata.user_id,
            user_name: wire.metadata.user_name,
            central_user_id: wire.metadata.central_user_id,
            bot: wire.metadata.bot,
            comment: wire.metadata.comment,
            page_id: wire.metadata.page_id,
            parent_id: wire.metadata.parent_id,
        };
        let mut change = EntityChange::from_parts(
            entity_id,
            wire.change_type,
            wire.diff_ops,
            wire.compact_diff,
            fields,
            metadata,
        );
        if let Some(id) = wire.id {
            change.set_id(id);
        }
        Ok(change)
    }
}
