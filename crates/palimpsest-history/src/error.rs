//! History engine error types.

use thiserror::Error;

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur during selection-history filtering.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] palimpsest_store::StoreError),

    /// Diff provider error.
    #[error("diff error: {0}")]
    Diff(#[from] palimpsest_diff::DiffError),
}
