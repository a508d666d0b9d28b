//! Title normalization for fuzzy catalog lookup.
//!
//! Filesystem names mangle punctuation ("Mission: Impossible" becomes
//! "Mission - Impossible" or "Mission Impossible"), so both the catalog index
//! and incoming queries are reduced to a common comparison key.

/// Punctuation replaced by a single space. Covers the characters filesystems
/// reject or substitute, plus the middle dot some release names use.
const SPACED: &[char] = &[
    '\\', '/', ':', '*', '?', '"', '<', '>', ',', '|', '-', '\u{00B7}',
];

/// Map a free-text title to its canonical comparison key.
///
/// Replaces the fixed punctuation set with spaces, drops apostrophes
/// entirely, lower-cases, collapses whitespace runs, and trims. Pure and
/// total; idempotent by construction.
///
/// # Example
///
/// ```
/// use reelsync::normalize::normalize_title;
///
/// assert_eq!(normalize_title("The Matrix"), normalize_title("the   MATRIX"));
/// assert_eq!(normalize_title("Don't Look Up"), "dont look up");
/// assert_eq!(normalize_title("Mission: Impossible"), "mission impossible");
/// ```
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| if SPACED.contains(&c) { ' ' } else { c })
        .collect();

    replaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
