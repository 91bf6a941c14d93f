//! Diff provider implementations.
//!
//! The engine consumes diffs only through the [`DiffProvider`] contract: two
//! on-disk revisions in, unified-diff text out. An empty string means the
//! revisions are identical. How the diff is produced (external process,
//! in-process library) is an implementation detail of the provider.

use crate::{DiffError, DiffResult};
use async_trait::async_trait;
use similar::{ChangeTag, TextDiff};
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// A collaborator that computes a unified text diff between two revisions.
#[async_trait]
pub trait DiffProvider: Send + Sync {
    /// Diff `old` against `new`, returning unified-diff text.
    ///
    /// Returns an empty string (or text without hunk headers) when the two
    /// revisions do not differ. Real failures come back as [`DiffError`].
    async fn diff(&self, old: &Path, new: &Path) -> DiffResult<String>;
}

/// Diff provider backed by an external `git diff --no-index` process.
///
/// Exit code 0 means no differences, 1 means differences were found, and
/// anything above 1 is a real failure.
#[derive(Debug, Clone, Default)]
pub struct GitDiffProvider {
    /// Override for the git binary name/path.
    git_binary: Option<String>,
}

impl GitDiffProvider {
    /// Create a provider using `git` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider using a specific git binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            git_binary: Some(binary.into()),
        }
    }
}

#[async_trait]
impl DiffProvider for GitDiffProvider {
    async fn diff(&self, old: &Path, new: &Path) -> DiffResult<String> {
        let binary = self.git_binary.as_deref().unwrap_or("git");

        debug!(old = %old.display(), new = %new.display(), "running git diff --no-index");

        let output = Command::new(binary)
            .arg("diff")
            .arg("--no-index")
            .arg("--")
            .arg(old)
            .arg(new)
            .output()
            .await?;

        match output.status.code() {
            // 0 = identical, 1 = differences found
            Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(DiffError::tool(format!(
                    "git diff exited with {:?}: {}",
                    code,
                    stderr.trim()
                )))
            }
        }
    }
}

/// In-process diff provider built on the `similar` crate.
///
/// Used in tests and wherever a `git` binary cannot be assumed. Produces
/// the same hunk-header format the parser consumes.
#[derive(Debug, Clone, Default)]
pub struct SimilarDiffProvider {
    context_lines: usize,
}

impl SimilarDiffProvider {
    /// Create a provider with the standard three lines of context.
    pub fn new() -> Self {
        Self { context_lines: 3 }
    }

    /// Create a provider with a custom context radius.
    pub fn with_context(context_lines: usize) -> Self {
        Self { context_lines }
    }
}

#[async_trait]
impl DiffProvider for SimilarDiffProvider {
    async fn diff(&self, old: &Path, new: &Path) -> DiffResult<String> {
        let old_bytes = fs::read(old).await?;
        let new_bytes = fs::read(new).await?;

        if old_bytes == new_bytes {
            return Ok(String::new());
        }

        let old_text = String::from_utf8_lossy(&old_bytes);
        let new_text = String::from_utf8_lossy(&new_bytes);

        let diff = TextDiff::from_lines(old_text.as_ref(), new_text.as_ref());
        let mut output = String::new();

        output.push_str(&format!("--- a/{}\n", old.display()));
        output.push_str(&format!("+++ b/{}\n", new.display()));

        for hunk in diff
            .unified_diff()
            .context_radius(self.context_lines)
            .iter_hunks()
        {
            output.push_str(&format!("{}\n", hunk.header()));
            for change in hunk.iter_changes() {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if !change.value().ends_with('\n') {
                    output.push('\n');
                }
            }
        }

        Ok(output)
    }
}
