//! Wildcard pattern matching.
//!
//! Exclusion patterns for history tracking use `*` as a wildcard matching
//! any sequence of characters, applied against scope-relative path strings
//! (e.g. `target/*`, `*.lock`, `node_modules/*`).

/// Match a string against a wildcard pattern.
///
/// The pattern can contain:
/// - `*` - matches any sequence of characters (including empty)
/// - Any other character - matches itself literally
///
/// # Examples
///
/// ```
/// use palimpsest_util::wildcard::matches;
///
/// assert!(matches("*.lock", "Cargo.lock"));
/// assert!(matches("target/*", "target/debug/app"));
/// assert!(matches("*", "anything"));
/// assert!(!matches("*.lock", "src/main.rs"));
/// ```
pub fn matches(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            // Remember the star position; first try matching zero characters
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            // Backtrack: let the last star consume one more character
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    // Trailing stars match the empty string
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }

    pi == p.len()
}

/// Check if a path matches any of the exclusion patterns.
pub fn matches_any(patterns: &[String], text: &str) -> bool {
    patterns.iter().any(|p| matches(p, text))
}
