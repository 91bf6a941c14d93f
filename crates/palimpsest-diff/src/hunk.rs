//! Unified-diff hunk parsing.
//!
//! Hunk headers follow `@@ -oldStart[,oldLines] +newStart[,newLines] @@` with
//! 1-based line numbers; an omitted count defaults to 1. Each hunk records the
//! set of 0-based *new-revision* line indices it touches: an added line marks
//! the position it occupies, a deleted line marks the seam where the old
//! content used to be. Relevance testing and backward range mapping both
//! reason purely in new-revision coordinates, so deletions must surface there
//! too.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::warn;

static HUNK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("hunk header regex")
});

/// One contiguous change region between an older and a newer revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// 1-based start line in the older revision.
    pub old_start: usize,
    /// Line count in the older revision (0 for a pure insertion).
    pub old_lines: usize,
    /// 1-based start line in the newer revision.
    pub new_start: usize,
    /// Line count in the newer revision (0 for a pure deletion).
    pub new_lines: usize,
    /// 0-based line indices in the newer revision touched by this hunk.
    pub touched_lines: BTreeSet<usize>,
}

impl DiffHunk {
    fn from_header(caps: &regex::Captures<'_>) -> Self {
        // An omitted count means a single line, e.g. `@@ -3 +3 @@`
        let num = |i: usize| caps.get(i).map_or(1, |m| m.as_str().parse().unwrap_or(1));
        Self {
            old_start: num(1),
            old_lines: num(2),
            new_start: num(3),
            new_lines: num(4),
            touched_lines: BTreeSet::new(),
        }
    }
}

/// Parse unified-diff text into an ordered sequence of hunks.
///
/// Hunks come out in diff order (ascending `new_start`). A header line that
/// starts with `@@` but does not match the expected pattern invalidates only
/// that hunk: its body lines are skipped and parsing resumes at the next
/// well-formed header. Text with no hunk headers yields an empty vec, which
/// callers treat as "no differences".
pub fn parse_hunks(diff: &str) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    let mut current: Option<DiffHunk> = None;
    // 0-based cursor into the new revision, tracked across body lines
    let mut cursor = 0usize;

    for line in diff.lines() {
        if line.starts_with("@@") {
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }
            match HUNK_HEADER.captures(line) {
                Some(caps) => {
                    let hunk = DiffHunk::from_header(&caps);
                    cursor = hunk.new_start.saturating_sub(1);
                    current = Some(hunk);
                }
                None => {
                    warn!(line, "skipping malformed hunk header");
                }
            }
        } else if let Some(hunk) = current.as_mut() {
            if line.starts_with(' ') {
                // Context advances the cursor without touching anything
                cursor += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                // Deletion: the seam stays at the cursor position
                hunk.touched_lines.insert(cursor);
            } else if line.starts_with('+') && !line.starts_with("+++") {
                hunk.touched_lines.insert(cursor);
                cursor += 1;
            }
            // Anything else ("\ No newline at end of file", git metadata) is ignored
        }
    }

    if let Some(hunk) = current {
        hunks.push(hunk);
    }

    hunks
}
