//! The per-scope snapshot ledger.
//!
//! A ledger is the persisted, append-ordered list of snapshots for one
//! storage scope. Persisted form is a single JSON document with one field so
//! append order survives reload.

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// Ordered collection of snapshots for one storage scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Snapshots in append order.
    pub snapshots: Vec<Snapshot>,
}

impl Ledger {
    /// Append a snapshot. The only mutation a ledger supports.
    pub fn append(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// All snapshots for one file path, unioned with every label marker,
    /// newest-first. Equal timestamps preserve insertion order.
    pub fn for_file(&self, scope_path: &str) -> Vec<Snapshot> {
        let mut result: Vec<Snapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.scope_path == scope_path || s.is_label())
            .cloned()
            .collect();
        // sort_by is stable, so ties keep append order
        result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        result
    }

    /// The most recent snapshot recorded for exactly this path.
    ///
    /// Label markers never match (their scope path is empty). Used for the
    /// dedup check before a save.
    pub fn latest_for_path(&self, scope_path: &str) -> Option<&Snapshot> {
        self.snapshots
            .iter()
            .filter(|s| !s.is_label() && s.scope_path == scope_path)
            .max_by_key(|s| s.timestamp)
    }

    /// Number of snapshots in the ledger.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the ledger holds no snapshots.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
