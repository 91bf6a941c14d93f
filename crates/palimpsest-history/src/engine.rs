//! The selection-history filtering walk.
//!
//! Walks a file's recorded history newest to oldest, carrying the selection
//! backward through each pair's hunks and collecting the snapshots whose
//! transition touched it. Diff computations are strictly sequential: the
//! mapped range coming out of one step is the input to the next.

use crate::error::HistoryResult;
use crate::selection::{is_relevant, map_backward, SelectionRange};
use palimpsest_diff::{parse_hunks, DiffHunk, DiffProvider};
use palimpsest_store::{HistoryStore, Snapshot};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Filters a file's history down to the snapshots relevant to a selection.
pub struct SelectionHistory {
    store: Arc<HistoryStore>,
    provider: Arc<dyn DiffProvider>,
}

impl SelectionHistory {
    /// Create an engine over a store and a diff provider.
    pub fn new(store: Arc<HistoryStore>, provider: Arc<dyn DiffProvider>) -> Self {
        Self { store, provider }
    }

    /// Filter a file's history to the snapshots relevant to `selection`.
    ///
    /// `selection` is expressed against the live content at `live_path`. The
    /// walk first re-bases it onto the newest snapshot (the live content is
    /// not itself a snapshot), then visits each adjacent pair newest→oldest:
    /// a pair whose hunks touch the current range contributes its newer
    /// snapshot, and the range is mapped backward into the older revision's
    /// coordinates for the next step. The oldest snapshot is always included;
    /// it is the origin of everything above it.
    ///
    /// A diff or content failure for one pair is recoverable: the step is
    /// logged and skipped, and the walk continues with the range unchanged.
    pub async fn filter_history_for_selection(
        &self,
        scope_path: &str,
        live_path: &Path,
        selection: SelectionRange,
    ) -> HistoryResult<Vec<Snapshot>> {
        let history = self.store.history_for_file(scope_path).await?;
        if history.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            scope_path,
            snapshots = history.len(),
            start = selection.start_line,
            end = selection.end_line,
            "filtering history for selection"
        );

        let mut current = selection;
        let mut relevant: Vec<Snapshot> = Vec::new();

        // Step 0: re-base the selection from live content onto the newest
        // snapshot. This contributes no result entry.
        match self.hunks_against_live(&history[0], live_path).await {
            Ok(hunks) => {
                current = map_backward(&current, &hunks);
                debug!(
                    start = current.start_line,
                    end = current.end_line,
                    "selection re-based onto newest snapshot"
                );
            }
            Err(e) => {
                warn!(newest = %history[0].id, error = %e, "could not re-base selection, keeping live coordinates");
            }
        }

        for pair in history.windows(2) {
            let (newer, older) = (&pair[0], &pair[1]);

            match self.hunks_between(older, newer).await {
                Ok(hunks) => {
                    if is_relevant(&current, &hunks) {
                        debug!(id = %newer.id, "relevant snapshot found");
                        relevant.push(newer.clone());
                    }
                    current = map_backward(&current, &hunks);
                }
                Err(e) => {
                    // Best-effort: identity mapping for this step
                    warn!(newer = %newer.id, older = %older.id, error = %e, "diff failed for pair, selection coordinates unchanged");
                }
            }
        }

        // The root revision is always relevant
        if let Some(oldest) = history.last() {
            relevant.push(oldest.clone());
        }

        debug!(scope_path, relevant = relevant.len(), "filtering complete");
        Ok(relevant)
    }

    /// Render the unified diff between one snapshot and the live file.
    ///
    /// A failure comes back as an inline error string, not an `Err`: this is
    /// display text for a single requested diff, and rendering must not
    /// abort.
    pub async fn render_snapshot_diff(&self, snapshot: &Snapshot, live_path: &Path) -> String {
        match self.snapshot_diff_text(snapshot, live_path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(id = %snapshot.id, error = %e, "snapshot diff failed");
                format!("Error calculating diff: {e}")
            }
        }
    }

    async fn snapshot_diff_text(
        &self,
        snapshot: &Snapshot,
        live_path: &Path,
    ) -> HistoryResult<String> {
        let old = self.store.content_location(snapshot).await?;
        Ok(self.provider.diff(&old, live_path).await?)
    }

    async fn hunks_against_live(
        &self,
        newest: &Snapshot,
        live_path: &Path,
    ) -> HistoryResult<Vec<DiffHunk>> {
        let old = self.store.content_location(newest).await?;
        let text = self.provider.diff(&old, live_path).await?;
        Ok(parse_hunks(&text))
    }

    async fn hunks_between(
        &self,
        older: &Snapshot,
        newer: &Snapshot,
    ) -> HistoryResult<Vec<DiffHunk>> {
        let old = self.store.content_location(older).await?;
        let new = self.store.content_location(newer).await?;
        let text = self.provider.diff(&old, &new).await?;
        Ok(parse_hunks(&text))
    }
}
