//! Snapshot store implementation.
//!
//! One [`HistoryStore`] owns every storage scope the process touches. A scope
//! is a directory holding `ledger.json` plus one immutable blob file per
//! snapshot, named by the snapshot id:
//!
//! ```text
//! <scope root>/
//!   ledger.json          # { "snapshots": [...] } in append order
//!   snp_01hq...          # content blobs, write-once
//!   snp_01hr...
//! ```
//!
//! Scope resolution is configuration-driven: with `save_in_project` set and a
//! project open, history lives under `<project>/.palimpsest`; otherwise under
//! the global per-install directory. Ledgers load lazily, once per scope per
//! process, and all mutation of one scope happens under that scope's mutex,
//! so persists apply in call order.

use crate::config::HistoryConfig;
use crate::error::{StoreError, StoreResult};
use crate::ledger::Ledger;
use crate::snapshot::{Snapshot, SnapshotEvent};
use palimpsest_util::path::project_history_dir;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

const LEDGER_FILE: &str = "ledger.json";

/// One loaded storage scope: its root directory and in-memory ledger.
///
/// The mutex is tokio's fair mutex, so waiters acquire in request order and
/// ledger persists for one scope can never interleave or reorder.
struct ScopeState {
    root: PathBuf,
    ledger: Mutex<Ledger>,
}

/// Versioned, content-deduplicated, append-only store of file revisions.
pub struct HistoryStore {
    /// Global per-install storage root.
    global_root: PathBuf,

    /// Root of the currently open project, if any.
    project_root: Option<PathBuf>,

    /// Store configuration.
    config: HistoryConfig,

    /// Loaded scopes, keyed by scope root. Populated on first access,
    /// retained for the process lifetime.
    scopes: RwLock<HashMap<PathBuf, Arc<ScopeState>>>,
}

impl HistoryStore {
    /// Create a store.
    ///
    /// # Arguments
    /// * `global_root` - global per-install storage directory
    /// * `project_root` - root of the open project, if one is open
    /// * `config` - history configuration
    pub fn new(global_root: PathBuf, project_root: Option<PathBuf>, config: HistoryConfig) -> Self {
        Self {
            global_root,
            project_root,
            config,
            scopes: RwLock::new(HashMap::new()),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Resolve the storage scope root for file content.
    ///
    /// Project-local when configured and a project is open, global otherwise.
    fn scope_root(&self) -> PathBuf {
        if self.config.save_in_project {
            if let Some(project) = &self.project_root {
                return project_history_dir(project);
            }
        }
        self.global_root.clone()
    }

    /// Get or lazily load the scope for the given root.
    async fn scope(&self, root: PathBuf) -> Arc<ScopeState> {
        if let Some(scope) = self.scopes.read().await.get(&root) {
            return scope.clone();
        }

        let mut scopes = self.scopes.write().await;
        // Re-check: another task may have loaded it while we waited
        if let Some(scope) = scopes.get(&root) {
            return scope.clone();
        }

        let ledger = load_ledger(&root).await;
        debug!(root = %root.display(), snapshots = ledger.len(), "loaded scope ledger");

        let scope = Arc::new(ScopeState {
            root: root.clone(),
            ledger: Mutex::new(ledger),
        });
        scopes.insert(root, scope.clone());
        scope
    }

    /// Save a new revision of a file.
    ///
    /// Returns `None` without touching the ledger when the content is
    /// byte-identical to the most recent snapshot for the same path, or when
    /// the blob cannot be written (the failure is logged, not propagated).
    pub async fn save_snapshot(
        &self,
        content: &[u8],
        scope_path: &str,
        event: SnapshotEvent,
        label: Option<String>,
        description: Option<String>,
    ) -> StoreResult<Option<Snapshot>> {
        let scope = self.scope(self.scope_root()).await;
        let mut ledger = scope.ledger.lock().await;

        // Dedup: elide the save if nothing changed since the last snapshot
        // of this path. An unreadable previous blob falls through to saving.
        if let Some(previous) = ledger.latest_for_path(scope_path) {
            if let Some(content_ref) = &previous.content_ref {
                match fs::read(scope.root.join(content_ref)).await {
                    Ok(previous_content) if previous_content == content => {
                        debug!(scope_path, "content identical to last snapshot, skipping save");
                        return Ok(None);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(scope_path, error = %e, "could not read previous blob for dedup check");
                    }
                }
            }
        }

        let mut snapshot = Snapshot::new(scope_path, event);
        if let Some(label) = label {
            snapshot = snapshot.with_label(label);
        }
        if let Some(description) = description {
            snapshot = snapshot.with_description(description);
        }

        // Blobs are write-once: named by id, never rewritten
        let blob_path = scope.root.join(snapshot.id.as_str());
        if let Err(e) = write_blob(&scope.root, &blob_path, content).await {
            warn!(scope_path, error = %e, "blob write failed, snapshot not recorded");
            return Ok(None);
        }

        ledger.append(snapshot.clone());
        if let Err(e) = persist_ledger(&scope.root, &ledger).await {
            warn!(root = %scope.root.display(), error = %e, "ledger persist failed");
        }

        info!(id = %snapshot.id, scope_path, event = ?snapshot.event, "snapshot recorded");
        Ok(Some(snapshot))
    }

    /// History for one file: its snapshots unioned with every label marker in
    /// the owning scope, newest-first.
    pub async fn history_for_file(&self, scope_path: &str) -> StoreResult<Vec<Snapshot>> {
        let scope = self.scope(self.scope_root()).await;
        let ledger = scope.ledger.lock().await;
        Ok(ledger.for_file(scope_path))
    }

    /// All snapshots across every loaded scope, newest-first.
    pub async fn history_for_scope(&self) -> StoreResult<Vec<Snapshot>> {
        // Make sure the active scope is loaded even if nothing touched it yet
        self.scope(self.scope_root()).await;

        let scopes = self.scopes.read().await;
        let mut all = Vec::new();
        for scope in scopes.values() {
            let ledger = scope.ledger.lock().await;
            all.extend(ledger.snapshots.iter().cloned());
        }
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(all)
    }

    /// Resolve a snapshot's content blob to a readable location.
    ///
    /// Fails with [`StoreError::ContentUnavailable`] for label markers and
    /// for snapshots whose blob has gone missing.
    pub async fn content_location(&self, snapshot: &Snapshot) -> StoreResult<PathBuf> {
        let content_ref = snapshot
            .content_ref
            .as_ref()
            .ok_or_else(|| StoreError::content_unavailable(snapshot.id.as_str()))?;

        let path = self.scope_root().join(content_ref);
        if fs::try_exists(&path).await.unwrap_or(false) {
            Ok(path)
        } else {
            Err(StoreError::content_unavailable(snapshot.id.as_str()))
        }
    }

    /// Append a scope-wide label marker to the active scope's ledger.
    pub async fn create_label(
        &self,
        name: &str,
        description: Option<String>,
    ) -> StoreResult<Snapshot> {
        let scope = self.scope(self.scope_root()).await;
        let mut ledger = scope.ledger.lock().await;

        let marker = Snapshot::label_marker(name, description);
        ledger.append(marker.clone());
        if let Err(e) = persist_ledger(&scope.root, &ledger).await {
            warn!(root = %scope.root.display(), error = %e, "ledger persist failed");
        }

        info!(id = %marker.id, name, "label recorded");
        Ok(marker)
    }
}

/// Load a scope's ledger from disk.
///
/// A missing file is a fresh scope; a corrupt file is logged and treated as
/// empty rather than surfaced as an error.
async fn load_ledger(root: &Path) -> Ledger {
    let path = root.join(LEDGER_FILE);
    match fs::read_to_string(&path).await {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt ledger file, starting empty");
                Ledger::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ledger::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read ledger, starting empty");
            Ledger::default()
        }
    }
}

/// Write a content blob, creating the scope directory on first use.
async fn write_blob(root: &Path, blob_path: &Path, content: &[u8]) -> StoreResult<()> {
    fs::create_dir_all(root).await?;
    fs::write(blob_path, content).await?;
    Ok(())
}

/// Persist a ledger atomically: write to a temp file, then rename.
async fn persist_ledger(root: &Path, ledger: &Ledger) -> StoreResult<()> {
    fs::create_dir_all(root).await?;

    let path = root.join(LEDGER_FILE);
    let content = serde_json::to_string_pretty(ledger)?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, &path).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_at(dir: &TempDir) -> HistoryStore {
        HistoryStore::new(
            dir.path().join("global"),
            None,
            HistoryConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_save_and_history() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        let snapshot = store
            .save_snapshot(b"v1\n", "src/main.rs", SnapshotEvent::Save, None, None)
            .await
            .unwrap()
            .expect("first save records a snapshot");
        assert_eq!(snapshot.scope_path, "src/main.rs");

        let history = store.history_for_file("src/main.rs").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, snapshot.id);
    }

    #[tokio::test]
    async fn test_dedup_idempotence() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        let first = store
            .save_snapshot(b"same\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        assert!(first.is_some());

        let second = store
            .save_snapshot(b"same\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        assert!(second.is_none(), "identical content must be elided");

        let history = store.history_for_file("a.txt").await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_dedup_only_against_same_path() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        store
            .save_snapshot(b"same\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        let other = store
            .save_snapshot(b"same\n", "b.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        assert!(other.is_some(), "dedup is per path, not per scope");
    }

    #[tokio::test]
    async fn test_ledger_append_only_and_ordered() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        let mut seen = Vec::new();
        for content in [b"v1\n".as_slice(), b"v2\n", b"v3\n"] {
            let s = store
                .save_snapshot(content, "a.txt", SnapshotEvent::Save, None, None)
                .await
                .unwrap()
                .unwrap();
            seen.push(s.id.clone());

            // After every save, history contains everything saved so far
            let history = store.history_for_file("a.txt").await.unwrap();
            let ids: Vec<_> = history.iter().map(|s| s.id.clone()).collect();
            for id in &seen {
                assert!(ids.contains(id));
            }
            // Newest-first ordering
            for pair in history.windows(2) {
                assert!(pair[0].timestamp >= pair[1].timestamp);
            }
        }
    }

    #[tokio::test]
    async fn test_labels_visible_in_every_file_history() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        store
            .save_snapshot(b"x\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        let marker = store
            .create_label("before refactor", Some("risky change".to_string()))
            .await
            .unwrap();

        let a = store.history_for_file("a.txt").await.unwrap();
        assert!(a.iter().any(|s| s.id == marker.id));

        let untouched = store.history_for_file("never-saved.txt").await.unwrap();
        assert_eq!(untouched.len(), 1);
        assert!(untouched[0].is_label());
    }

    #[tokio::test]
    async fn test_content_location_for_label_fails() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        let marker = store.create_label("tag", None).await.unwrap();
        let result = store.content_location(&marker).await;
        assert!(matches!(result, Err(StoreError::ContentUnavailable(_))));
    }

    #[tokio::test]
    async fn test_content_location_resolves_blob() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        let snapshot = store
            .save_snapshot(b"hello\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap()
            .unwrap();

        let path = store.content_location(&snapshot).await.unwrap();
        let content = fs::read(&path).await.unwrap();
        assert_eq!(content, b"hello\n");
    }

    #[tokio::test]
    async fn test_concurrent_saves_apply_in_order() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_at(&dir));

        // Distinct contents against one path, all racing for the scope mutex
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .save_snapshot(
                        format!("v{i}\n").as_bytes(),
                        "a.txt",
                        SnapshotEvent::Save,
                        None,
                        None,
                    )
                    .await
                    .unwrap()
                    .expect("distinct content is never elided")
            }));
        }
        let mut saved = Vec::new();
        for handle in handles {
            saved.push(handle.await.unwrap());
        }

        // A fresh store sees only the persisted ledger: every append
        // survived and the file parsed cleanly, so no persist interleaved
        let store = store_at(&dir);
        let history = store.history_for_file("a.txt").await.unwrap();
        assert_eq!(history.len(), saved.len());

        let ids: std::collections::HashSet<_> = history.iter().map(|s| s.id.clone()).collect();
        for snapshot in &saved {
            assert!(ids.contains(&snapshot.id));
        }
        for pair in history.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_reload_preserves_order() {
        let dir = TempDir::new().unwrap();
        let ids: Vec<_> = {
            let store = store_at(&dir);
            let mut ids = Vec::new();
            for content in [b"v1\n".as_slice(), b"v2\n", b"v3\n"] {
                let s = store
                    .save_snapshot(content, "a.txt", SnapshotEvent::Save, None, None)
                    .await
                    .unwrap()
                    .unwrap();
                ids.push(s.id);
            }
            ids
        };

        // Fresh store instance reads the persisted ledger
        let store = store_at(&dir);
        let history = store.history_for_file("a.txt").await.unwrap();
        let reloaded: Vec<_> = history.into_iter().rev().map(|s| s.id).collect();
        assert_eq!(reloaded, ids);
    }

    #[tokio::test]
    async fn test_corrupt_ledger_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("global");
        fs::create_dir_all(&root).await.unwrap();
        fs::write(root.join(LEDGER_FILE), b"{not json").await.unwrap();

        let store = store_at(&dir);
        let history = store.history_for_file("a.txt").await.unwrap();
        assert!(history.is_empty());

        // And the scope still accepts new snapshots
        let saved = store
            .save_snapshot(b"v1\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        assert!(saved.is_some());
    }

    #[tokio::test]
    async fn test_project_scope_resolution() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(&project).await.unwrap();

        let config = HistoryConfig {
            save_in_project: true,
            ..HistoryConfig::default()
        };
        let store = HistoryStore::new(dir.path().join("global"), Some(project.clone()), config);

        store
            .save_snapshot(b"v1\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();

        assert!(project.join(".palimpsest").join(LEDGER_FILE).exists());
        assert!(!dir.path().join("global").exists());
    }

    #[tokio::test]
    async fn test_history_for_scope_sees_everything() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);

        store
            .save_snapshot(b"a\n", "a.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        store
            .save_snapshot(b"b\n", "b.txt", SnapshotEvent::Save, None, None)
            .await
            .unwrap();
        store.create_label("tag", None).await.unwrap();

        let all = store.history_for_scope().await.unwrap();
        assert_eq!(all.len(), 3);
        for pair in all.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }
}
