//! Note search port and the bundled substring matcher.

use crate::models::Note;

/// Black-box matcher producing ordered results for a query
pub trait NoteSearch {
    /// Matches for `query` among notes visible to `owner_id`.
    ///
    /// `None` means no search is active and the sidebar should browse.
    fn search(&self, notes: &[Note], owner_id: &str, query: &str) -> Option<Vec<Note>>;
}

/// Case-insensitive substring match over title and content
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringSearch;

impl NoteSearch for SubstringSearch {
    fn search(&self, notes: &[Note], owner_id: &str, query: &str) -> Option<Vec<Note>> {
        let query = normalize_query(query);
        if query.is_empty() {
            return None;
        }

        Some(
            notes
                .iter()
                .filter(|note| note.is_visible_to(owner_id))
                .filter(|note| note_matches_query(note, &query))
                .cloned()
                .collect(),
        )
    }
}

fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn note_matches_query(note: &Note, query: &str) -> bool {
    note.title.to_lowercase().contains(query) || note.content.to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn notes() -> Vec<Note> {
        vec![
            Note::new("rust-notes", "me", "Ownership and borrowing").unwrap(),
            Note::new("shopping", "me", "Milk, EGGS").unwrap(),
            Note::new("theirs", "someone-else", "eggs benedict").unwrap(),
            Note::new("about-me", "admin", "Eggs are great")
                .unwrap()
                .with_public(true),
        ]
    }

    fn slugs(results: Option<Vec<Note>>) -> Option<Vec<String>> {
        results.map(|notes| notes.into_iter().map(|note| note.slug).collect())
    }

    #[test]
    fn blank_query_is_not_a_search() {
        assert_eq!(SubstringSearch.search(&notes(), "me", ""), None);
        assert_eq!(SubstringSearch.search(&notes(), "me", "   "), None);
    }

    #[test]
    fn matches_title_and_content_case_insensitively() {
        assert_eq!(
            slugs(SubstringSearch.search(&notes(), "me", "eggs")),
            Some(vec!["shopping".to_string(), "about-me".to_string()])
        );
        assert_eq!(
            slugs(SubstringSearch.search(&notes(), "me", "RUST")),
            Some(vec!["rust-notes".to_string()])
        );
    }

    #[test]
    fn no_match_is_an_empty_search() {
        assert_eq!(
            slugs(SubstringSearch.search(&notes(), "me", "zebra")),
            Some(Vec::new())
        );
    }
}
