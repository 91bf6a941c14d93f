//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error on a ledger or blob.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Ledger serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot has no retrievable content (label marker or missing blob).
    #[error("no content available for snapshot {0}")]
    ContentUnavailable(String),
}

impl StoreError {
    /// Create a content-unavailable error for a snapshot id.
    pub fn content_unavailable(id: impl Into<String>) -> Self {
        Self::ContentUnavailable(id.into())
    }
}
