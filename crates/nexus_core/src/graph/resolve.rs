//! Title-based reference resolution.
//!
//! # Invariants
//! - Matching is exact: case-sensitive, no whitespace normalization.
//! - When several notes share a title, the first in collection order wins.
//! - Unknown titles resolve to `None`; they are never an error.

use crate::model::note::Note;
use std::collections::HashMap;

/// Resolves `title` against `notes` by linear scan.
pub fn resolve_title<'a>(title: &str, notes: &'a [Note]) -> Option<&'a Note> {
    notes.iter().find(|note| note.title == title)
}

/// Title lookup built once per graph build.
///
/// Gives the same answers as [`resolve_title`] in O(1) per query.
#[derive(Debug)]
pub struct TitleIndex<'a> {
    notes: &'a [Note],
    first_by_title: HashMap<&'a str, usize>,
}

impl<'a> TitleIndex<'a> {
    pub fn new(notes: &'a [Note]) -> Self {
        let mut first_by_title = HashMap::with_capacity(notes.len());
        for (index, note) in notes.iter().enumerate() {
            first_by_title.entry(note.title.as_str()).or_insert(index);
        }
        Self {
            notes,
            first_by_title,
        }
    }

    pub fn resolve(&self, title: &str) -> Option<&'a Note> {
        self.first_by_title
            .get(title)
            .and_then(|index| self.notes.get(*index))
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_title, TitleIndex};
    use crate::model::note::Note;

    fn notes() -> Vec<Note> {
        vec![
            Note::new("1", "Alpha", ""),
            Note::new("2", "Beta", ""),
            Note::new("3", "Alpha", "duplicate title"),
        ]
    }

    #[test]
    fn exact_match_resolves() {
        let notes = notes();
        assert_eq!(resolve_title("Beta", &notes).map(|n| n.id.as_str()), Some("2"));
    }

    #[test]
    fn case_and_whitespace_are_significant() {
        let notes = notes();
        assert!(resolve_title("beta", &notes).is_none());
        assert!(resolve_title(" Beta", &notes).is_none());
        assert!(resolve_title("", &notes).is_none());
    }

    #[test]
    fn duplicate_titles_resolve_to_first_note() {
        let notes = notes();
        assert_eq!(resolve_title("Alpha", &notes).map(|n| n.id.as_str()), Some("1"));
        let index = TitleIndex::new(&notes);
        assert_eq!(index.resolve("Alpha").map(|n| n.id.as_str()), Some("1"));
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let notes = notes();
        let index = TitleIndex::new(&notes);
        for title in ["Alpha", "Beta", "Gamma", "alpha", ""] {
            assert_eq!(
                index.resolve(title).map(|n| &n.id),
                resolve_title(title, &notes).map(|n| &n.id)
            );
        }
    }
}
