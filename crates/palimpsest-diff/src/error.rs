//! Diff error types.

use thiserror::Error;

/// Result type for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;

/// Errors that can occur while computing a diff.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The external diff tool failed.
    #[error("diff tool failed: {0}")]
    Tool(String),

    /// IO error while reading a revision or spawning the tool.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiffError {
    /// Create a tool-failure error.
    pub fn tool(message: impl Into<String>) -> Self {
        Self::Tool(message.into())
    }
}
