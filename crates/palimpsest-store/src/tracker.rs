//! Inbound file-lifecycle interface.
//!
//! The surrounding editor-integration layer reports save/open/rename events
//! here; the tracker applies the enable flag and exclusion patterns, then
//! records snapshots through the store. It never reaches back into the
//! editor.

use crate::error::StoreResult;
use crate::snapshot::{Snapshot, SnapshotEvent};
use crate::store::HistoryStore;
use palimpsest_util::wildcard;
use std::sync::Arc;
use tracing::{debug, info};

/// Records history in response to file lifecycle events.
pub struct HistoryTracker {
    store: Arc<HistoryStore>,
}

impl HistoryTracker {
    /// Create a tracker over a store.
    pub fn new(store: Arc<HistoryStore>) -> Self {
        Self { store }
    }

    /// Whether a scope-relative path is excluded from tracking.
    fn is_excluded(&self, scope_path: &str) -> bool {
        wildcard::matches_any(&self.store.config().exclude, scope_path)
    }

    fn is_tracked(&self, scope_path: &str) -> bool {
        self.store.config().enabled && !self.is_excluded(scope_path)
    }

    /// A file was saved: record a `Save` snapshot (subject to dedup).
    pub async fn on_file_saved(
        &self,
        scope_path: &str,
        content: &[u8],
    ) -> StoreResult<Option<Snapshot>> {
        if !self.is_tracked(scope_path) {
            debug!(scope_path, "save not tracked");
            return Ok(None);
        }
        self.store
            .save_snapshot(content, scope_path, SnapshotEvent::Save, None, None)
            .await
    }

    /// A file was opened: record an initial baseline if the file has no
    /// content history yet (label markers don't count).
    pub async fn on_file_opened(
        &self,
        scope_path: &str,
        content: &[u8],
    ) -> StoreResult<Option<Snapshot>> {
        if !self.is_tracked(scope_path) {
            return Ok(None);
        }

        let history = self.store.history_for_file(scope_path).await?;
        if history.iter().any(|s| !s.is_label()) {
            return Ok(None);
        }

        info!(scope_path, "creating initial baseline");
        self.store
            .save_snapshot(
                content,
                scope_path,
                SnapshotEvent::Manual,
                Some("Initial baseline".to_string()),
                None,
            )
            .await
    }

    /// A file was renamed: record a `Rename` snapshot under the new path.
    pub async fn on_file_renamed(
        &self,
        _old_path: &str,
        new_path: &str,
        content: &[u8],
    ) -> StoreResult<Option<Snapshot>> {
        if !self.is_tracked(new_path) {
            return Ok(None);
        }
        self.store
            .save_snapshot(content, new_path, SnapshotEvent::Rename, None, None)
            .await
    }
}
