//! Line-range algebra over diff hunks.
//!
//! A selection is a half-open line interval in the *newer* revision of a
//! pair. [`is_relevant`] asks whether any hunk touched it; [`map_backward`]
//! re-expresses it in the older revision's coordinates. Both work with the
//! selection's effective end: an end boundary at character 0 of a later line
//! excludes that line.

use palimpsest_diff::DiffHunk;

/// A half-open line interval `[start_line, end_line)` with the raw end
/// character offset. Lines are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    /// First selected line.
    pub start_line: usize,
    /// One past the last selected line.
    pub end_line: usize,
    /// Raw character offset of the selection end within `end_line`. Only its
    /// zero-ness matters: 0 means the end sits exactly on a line boundary.
    pub end_character: usize,
}

impl SelectionRange {
    /// A range with an explicit end character offset.
    pub fn new(start_line: usize, end_line: usize, end_character: usize) -> Self {
        Self {
            start_line,
            end_line,
            end_character,
        }
    }

    /// A whole-lines range (end on a line boundary).
    pub fn lines(start_line: usize, end_line: usize) -> Self {
        Self::new(start_line, end_line, 0)
    }

    /// The last line index the selection effectively covers.
    ///
    /// An end at character 0 of a line past the start excludes that line.
    pub fn effective_end(&self) -> usize {
        if self.end_character == 0 && self.end_line > self.start_line {
            self.end_line - 1
        } else {
            self.end_line
        }
    }
}

/// Whether any hunk touches a line inside the selection.
pub fn is_relevant(range: &SelectionRange, hunks: &[DiffHunk]) -> bool {
    let start = range.start_line;
    let end = range.effective_end();

    hunks
        .iter()
        .flat_map(|h| h.touched_lines.iter())
        .any(|&line| line >= start && line <= end)
}

/// Map a selection from the newer revision of a pair into the older one.
///
/// Hunks entirely before a boundary shift it by the hunk's net line delta;
/// a hunk straddling a boundary snaps it to the hunk's position in the older
/// revision: its start for the selection start, and its last old line for the
/// selection end (or its nominal position when the hunk added purely new
/// content). Hunks are ordered and non-overlapping in new-revision
/// coordinates, so each shift is independent and cumulative.
///
/// The result is whole-lines: character precision is intentionally dropped.
pub fn map_backward(range: &SelectionRange, hunks: &[DiffHunk]) -> SelectionRange {
    let start = range.start_line as i64;
    let end = range.effective_end() as i64;

    let mut new_start = start;
    let mut new_end = end;

    for h in hunks {
        let h_new_start = h.new_start as i64 - 1; // 0-based
        let h_new_end = h_new_start + h.new_lines as i64; // exclusive
        let shift = h.new_lines as i64 - h.old_lines as i64;

        // Start boundary
        if h_new_end <= start {
            new_start -= shift;
        } else if h_new_start < start && start < h_new_end {
            new_start = h.old_start as i64 - 1;
        }

        // End boundary
        if h_new_end <= end {
            new_end -= shift;
        } else if h_new_start <= end && end < h_new_end {
            // Snap to the last old line the hunk covers; a pure insertion
            // has no old lines, so it snaps to the hunk's nominal position
            new_end = (h.old_start as i64 - 1) + (h.old_lines as i64 - 1).max(0);
        }
    }

    SelectionRange::lines(new_start.max(0) as usize, (new_end.max(0) + 1) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palimpsest_diff::parse_hunks;

    #[test]
    fn test_effective_end_excludes_boundary_line() {
        assert_eq!(SelectionRange::lines(0, 2).effective_end(), 1);
        assert_eq!(SelectionRange::new(0, 2, 5).effective_end(), 2);
        // A zero-height range keeps its end line
        assert_eq!(SelectionRange::lines(3, 3).effective_end(), 3);
    }

    #[test]
    fn test_relevance_boundary() {
        // Hunk touching new-revision line index 2
        let hunks = parse_hunks("@@ -3,1 +3,1 @@\n-old\n+new\n");
        assert_eq!(hunks[0].touched_lines.iter().copied().max(), Some(2));

        assert!(!is_relevant(&SelectionRange::lines(0, 2), &hunks));
        assert!(is_relevant(&SelectionRange::lines(0, 3), &hunks));
        assert!(is_relevant(&SelectionRange::lines(2, 5), &hunks));
        assert!(!is_relevant(&SelectionRange::lines(3, 5), &hunks));
    }

    #[test]
    fn test_no_hunks_is_identity() {
        let range = SelectionRange::lines(4, 9);
        assert!(!is_relevant(&range, &[]));
        assert_eq!(map_backward(&range, &[]), range);
    }

    #[test]
    fn test_map_backward_pure_append_drops_out_of_range() {
        // Old: 3 lines, new: 4 lines with line 4 appended
        let hunks = parse_hunks("@@ -3,1 +3,2 @@\n line three\n+line four\n");
        let mapped = map_backward(&SelectionRange::lines(0, 4), &hunks);
        assert_eq!(mapped, SelectionRange::lines(0, 3));
    }

    #[test]
    fn test_map_backward_insertion_before() {
        // Old: [A, C], new: [A, B, C]
        let hunks = parse_hunks("@@ -2,0 +2,1 @@\n+B\n");
        // Selecting C (new index 2) lands on old index 1
        let mapped = map_backward(&SelectionRange::lines(2, 3), &hunks);
        assert_eq!(mapped, SelectionRange::lines(1, 2));
    }

    #[test]
    fn test_map_backward_deletion_before() {
        // Old: [A, B, C], new: [A, C]
        let hunks = parse_hunks("@@ -2,1 +2,0 @@\n-B\n");
        // Selecting C (new index 1) lands on old index 2
        let mapped = map_backward(&SelectionRange::lines(1, 2), &hunks);
        assert_eq!(mapped, SelectionRange::lines(2, 3));
    }

    #[test]
    fn test_map_backward_straddled_start_snaps_to_hunk_start() {
        // Hunk replaces new lines 2-4 (indices 1..4) with old lines 2-3
        let hunks = parse_hunks("@@ -2,2 +2,3 @@\n-x\n-y\n+p\n+q\n+r\n");
        // Selection starts inside the hunk at index 2
        let mapped = map_backward(&SelectionRange::lines(2, 6), &hunks);
        // Start snaps to the hunk's old start (index 1)
        assert_eq!(mapped.start_line, 1);
    }

    #[test]
    fn test_map_backward_straddled_end_snaps_to_last_old_line() {
        let hunks = parse_hunks("@@ -2,2 +2,3 @@\n-x\n-y\n+p\n+q\n+r\n");
        // Selection ends inside the hunk (effective end 2)
        let mapped = map_backward(&SelectionRange::lines(0, 3), &hunks);
        // End snaps to the hunk's last old line (index 2), half-open end 3
        assert_eq!(mapped, SelectionRange::lines(0, 3));
    }

    #[test]
    fn test_map_backward_straddled_end_on_pure_insertion() {
        // Pure insertion of two lines at new indices 1..3
        let hunks = parse_hunks("@@ -2,0 +2,2 @@\n+B\n+C\n");
        // Effective end 2 falls inside the inserted region
        let mapped = map_backward(&SelectionRange::lines(0, 3), &hunks);
        // No old lines to cover: end snaps to the hunk's nominal old position
        assert_eq!(mapped, SelectionRange::lines(0, 2));
    }

    #[test]
    fn test_map_backward_multiple_hunks_accumulate() {
        // Two insertions before the selection, one line each
        let hunks =
            parse_hunks("@@ -2,0 +2,1 @@\n+first\n@@ -5,0 +6,1 @@\n+second\n");
        // Selecting new index 8 slides back past both insertions
        let mapped = map_backward(&SelectionRange::lines(8, 9), &hunks);
        assert_eq!(mapped, SelectionRange::lines(6, 7));
    }

    #[test]
    fn test_map_backward_result_is_whole_lines() {
        let hunks = parse_hunks("@@ -1,1 +1,1 @@\n-a\n+b\n");
        let mapped = map_backward(&SelectionRange::new(3, 5, 7), &hunks);
        assert_eq!(mapped.end_character, 0);
    }
}
