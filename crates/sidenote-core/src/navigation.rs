//! Selection and highlight tracking for the sidebar.
//!
//! While browsing, up/down moves the route selection through the flattened
//! category order. While a search is active, up/down only moves a highlight
//! index through the search results.

use serde::{Deserialize, Serialize};

use crate::grouping::GroupedNotes;
use crate::models::{Note, Route};

/// Direction of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Whether the sidebar is listing groups or search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Browsing,
    Searching {
        /// Ordered matches from the search collaborator
        results: Vec<Note>,
        /// Highlighted position in `results`
        index: usize,
    },
}

/// Step `index` one position in `direction`, wrapping within `len`
#[must_use]
pub const fn wrap_step(index: usize, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    match direction {
        Direction::Down => (index + 1) % len,
        Direction::Up => (index + len - 1) % len,
    }
}

/// Neighbour of `current` in the flattened order, wrapping at both ends.
///
/// Returns `None` when the list is empty or `current` is not listed.
#[must_use]
pub fn neighbour<'a>(
    flattened: &[&'a Note],
    current: Option<&str>,
    direction: Direction,
) -> Option<&'a Note> {
    let current = current?;
    let index = flattened.iter().position(|note| note.slug == current)?;
    let next = wrap_step(index, flattened.len(), direction);
    flattened.get(next).copied()
}

/// Route selection plus search highlight
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    selected_slug: Option<String>,
    mode: SearchMode,
    query: String,
}

impl NavigationState {
    /// Fresh state with nothing selected
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the active route; the final path segment is the selection
    pub fn select_route(&mut self, path: &str) {
        self.selected_slug = Route::slug_from_path(path);
    }

    /// Currently route-selected slug
    #[must_use]
    pub fn selected_slug(&self) -> Option<&str> {
        self.selected_slug.as_deref()
    }

    /// Current search mode
    #[must_use]
    pub const fn mode(&self) -> &SearchMode {
        &self.mode
    }

    /// Whether search results are driving navigation
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        matches!(self.mode, SearchMode::Searching { .. })
    }

    /// Text of the active search query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Install a new search outcome. `None` returns to browsing.
    pub fn set_search_results(&mut self, query: &str, results: Option<Vec<Note>>) {
        self.query = query.to_string();
        self.mode = match results {
            Some(results) => SearchMode::Searching { results, index: 0 },
            None => SearchMode::Browsing,
        };
    }

    /// Leave search mode and forget the query
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.mode = SearchMode::Browsing;
    }

    /// Move one step in `direction`.
    ///
    /// While searching this moves the highlight and returns `None`. While
    /// browsing it returns the route of the neighbouring note, or `None` if
    /// there is nothing to move to.
    pub fn navigate(&mut self, direction: Direction, grouped: &GroupedNotes) -> Option<Route> {
        if let SearchMode::Searching { results, index } = &mut self.mode {
            *index = wrap_step(*index, results.len(), direction);
            tracing::debug!(index = *index, "Moved search highlight");
            return None;
        }

        let flattened = grouped.flatten();
        let next = neighbour(&flattened, self.selected_slug(), direction)?;
        tracing::debug!(from = ?self.selected_slug, to = %next.slug, "Navigating");
        Some(next.route())
    }

    /// Highlighted search position, if searching
    #[must_use]
    pub const fn highlight_index(&self) -> Option<usize> {
        match &self.mode {
            SearchMode::Searching { index, .. } => Some(*index),
            SearchMode::Browsing => None,
        }
    }

    /// Note the keyboard shortcuts act on.
    ///
    /// The highlighted search result when a non-empty search is active,
    /// otherwise the route-selected note looked up in `notes`.
    #[must_use]
    pub fn highlighted_note<'a>(&'a self, notes: &'a [Note]) -> Option<&'a Note> {
        if let SearchMode::Searching { results, index } = &self.mode {
            if let Some(note) = results.get(*index) {
                return Some(note);
            }
        }

        let selected = self.selected_slug()?;
        notes.iter().find(|note| note.slug == selected)
    }

    /// Drop a slug from the active search results, keeping the highlight in range
    pub fn forget(&mut self, slug: &str) {
        if let SearchMode::Searching { results, index } = &mut self.mode {
            results.retain(|note| note.slug != slug);
            if *index >= results.len() {
                *index = results.len().saturating_sub(1);
            }
        }
    }
}
