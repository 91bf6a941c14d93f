//! Selection history engine for palimpsest.
//!
//! Given a line range selected in the current revision of a file, this crate
//! answers which recorded snapshots actually touched that range, and where the
//! same logical range lives in each older revision's own coordinate space.
//!
//! The engine walks the file's history newest to oldest, diffing each
//! adjacent pair through a [`palimpsest_diff::DiffProvider`], testing the
//! selection against the pair's hunks, and mapping the selection backward one
//! revision step at a time. All mapping is line-granular; character offsets
//! are used only to decide whether a selection end sitting at column 0
//! excludes its line.

mod engine;
mod error;
mod selection;

pub use engine::SelectionHistory;
pub use error::{HistoryError, HistoryResult};
pub use selection::{is_relevant, map_backward, SelectionRange};
