//! Append-only snapshot store for palimpsest.
//!
//! Each storage scope (global per-install directory or a project-local
//! `.palimpsest/` directory) owns a JSON ledger of snapshot metadata plus one
//! immutable content blob per snapshot, named by the snapshot's id. The store
//! offers:
//! - Dedup-aware saves: content identical to the most recent snapshot for the
//!   same path is elided.
//! - Newest-first history queries per file (label markers included) and per
//!   scope.
//! - Scope-wide label markers carrying no content.
//! - Serialized per-scope ledger persistence: concurrent saves against one
//!   scope apply in call order.
//!
//! The ledger is loaded lazily, at most once per scope per process, and a
//! missing or corrupt ledger file is treated as empty rather than an error.

mod config;
mod error;
mod ledger;
mod snapshot;
mod store;
mod tracker;

pub use config::HistoryConfig;
pub use error::{StoreError, StoreResult};
pub use ledger::Ledger;
pub use snapshot::{Snapshot, SnapshotEvent, SnapshotId};
pub use store::HistoryStore;
pub use tracker::HistoryTracker;
