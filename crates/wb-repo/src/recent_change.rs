//! Attaching RecentChange data to stored changes.
//!
//! A change is saved when the revision is created, before the RecentChange
//! row exists. Once that row is written, [`RecentChangeSaveHandler`] copies
//! its timestamp, user and revision fields into the stored change.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use wb_change::{ChangeStore, EntityChange, RevisionMetadata};
use wb_types::EntityId;

use crate::error::Result;

/// The RecentChange attributes the handler reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentChange {
    /// `rc_this_oldid`. Zero or negative for log entries such as undeletions.
    pub this_oldid: i64,
    pub last_oldid: u64,
    pub cur_id: u64,
    pub timestamp: DateTime<Utc>,
    pub log_type: Option<String>,
    pub log_action: Option<String>,
    pub bot: bool,
    pub comment: String,
    pub user_id: u64,
    pub user_text: String,
}

impl RecentChange {
    /// Edits and undeletions carry entity changes. Other log entries don't.
    fn carries_entity_change(&self) -> bool {
        match (self.log_type.as_deref(), self.log_action.as_deref()) {
            (None, _) => true,
            (Some("delete"), Some("restore")) => true,
            _ => false,
        }
    }
}

/// Maps local users to central (cross-wiki) user ids.
pub trait CentralIdLookup: Send + Sync {
    fn central_id_for_local_user(&self, user_id: u64, user_name: &str) -> u64;
}

/// Receives a job for each entity whose changes should be dispatched to
/// client wikis.
pub trait DispatchQueue: Send + Sync {
    fn push_dispatch_job(&self, entity_id: &EntityId) -> Result<()>;
}

pub struct RecentChangeSaveHandler {
    store: Arc<dyn ChangeStore>,
    central_ids: Option<Arc<dyn CentralIdLookup>>,
    dispatch: Arc<dyn DispatchQueue>,
    dispatch_via_jobs_enabled: bool,
}

impl RecentChangeSaveHandler {
    pub fn new(
        store: Arc<dyn ChangeStore>,
        central_ids: Option<Arc<dyn CentralIdLookup>>,
        dispatch: Arc<dyn DispatchQueue>,
        dispatch_via_jobs_enabled: bool,
    ) -> Self {
        Self {
            store,
            central_ids,
            dispatch,
            dispatch_via_jobs_enabled,
        }
    }

    /// Returns the updated change, or `None` when the RecentChange has no
    /// stored change to update.
    pub fn on_recent_change_save(&self, rc: &RecentChange) -> Result<Option<EntityChange>> {
        let Ok(revision_id) = u64::try_from(rc.this_oldid) else {
            debug!(rc_this_oldid = rc.this_oldid, "recent change without revision");
            return Ok(None);
        };
        if revision_id == 0 || !rc.carries_entity_change() {
            debug!(
                rc_this_oldid = rc.this_oldid,
                log_type = rc.log_type.as_deref(),
                "recent change not tied to an entity change"
            );
            return Ok(None);
        }

        let Some(mut change) = self.store.load_by_revision_id(revision_id)? else {
            debug!(revision_id, "no entity change for revision");
            return Ok(None);
        };

        let central_user_id = self
            .central_ids
            .as_ref()
            .map_or(0, |lookup| lookup.central_id_for_local_user(rc.user_id, &rc.user_text));

        change.set_fields(revision_id, rc.timestamp);
        change.set_metadata(RevisionMetadata {
            bot: rc.bot,
            comment: rc.comment.clone(),
            page_id: rc.cur_id,
            parent_id: rc.last_oldid,
        });
        change.add_user_metadata(rc.user_id, rc.user_text.clone(), central_user_id);
        self.store.save_change(&mut change)?;

        if self.dispatch_via_jobs_enabled {
            self.dispatch.push_dispatch_job(change.entity_id())?;
            info!(entity = %change.entity_id(), "enqueued dispatch job");
        }
        Ok(Some(change))
    }
}
