//! Wiki-link marker extraction.
//!
//! # Responsibility
//! - Scan note bodies for `[[Title]]` markers.
//!
//! # Invariants
//! - Captures are non-greedy: the first `]]` after `[[` closes the marker.
//! - Captures never span a line terminator (`\n`, `\r`, U+2028, U+2029).
//! - Empty markers (`[[]]`) and duplicates are reported as-is.

use once_cell::sync::Lazy;
use regex::Regex;

static WIKI_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\n\r\x{2028}\x{2029}]*?)\]\]").expect("valid wiki-link regex")
});

/// Returns every marker title in `body`, in order of appearance.
pub fn extract_links(body: &str) -> Vec<String> {
    WIKI_LINK_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Counts markers in `body` without allocating titles.
pub fn count_link_markers(body: &str) -> usize {
    WIKI_LINK_RE.find_iter(body).count()
}
