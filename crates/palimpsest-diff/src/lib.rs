//! Diff computation boundary for palimpsest.
//!
//! This crate owns two things:
//! - The [`DiffProvider`] trait: a narrow collaborator contract that turns
//!   two on-disk revisions into unified-diff text. Implementations cover an
//!   external `git diff --no-index` subprocess and an in-process fallback
//!   built on the `similar` crate.
//! - The hunk parser: [`parse_hunks`] turns unified-diff text into ordered
//!   [`DiffHunk`]s carrying the new-revision line indices each hunk touches.
//!
//! Empty diff text (or text without hunk headers) is a valid result and
//! means "no differences"; provider failures are reported as [`DiffError`].

mod error;
mod hunk;
mod provider;

pub use error::{DiffError, DiffResult};
pub use hunk::{parse_hunks, DiffHunk};
pub use provider::{DiffProvider, GitDiffProvider, SimilarDiffProvider};
