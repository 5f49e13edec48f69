//! Sidebar controller.
//!
//! Owns the note list, the pinned set, the grouping and the navigation
//! state, and drives the router and command palette ports. Every keyboard
//! command is resolved against the state current at the moment it runs.

use chrono::{DateTime, Local, TimeZone};

use crate::config::SidebarConfig;
use crate::error::Result;
use crate::grouping::{group_notes, GroupedNotes};
use crate::keyboard::{Command, FocusTarget, KeyInput, KeyMap, KeyOutcome};
use crate::models::{Note, Route};
use crate::navigation::{Direction, NavigationState, SearchMode};
use crate::notice::Notice;
use crate::pins::{PinRegistry, PinStore};
use crate::ports::{CommandPalette, Navigator};
use crate::search::NoteSearch;
use crate::store::NoteStore;

/// A delete that passed the guard and is waiting on the datastore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTicket {
    pub slug: String,
    pub owner_id: String,
}

/// Sidebar state and the shortcuts that act on it
pub struct Sidebar<P: PinStore, N: Navigator, C: CommandPalette> {
    owner_id: String,
    notes: Vec<Note>,
    pins: PinRegistry<P>,
    grouped: GroupedNotes,
    navigation: NavigationState,
    keymap: KeyMap,
    compact_layout: bool,
    fallback_slug: String,
    navigator: N,
    palette: C,
    notices: Vec<Notice>,
}

impl<P: PinStore, N: Navigator, C: CommandPalette> Sidebar<P, N, C> {
    /// Build a sidebar over `notes`, loading (or seeding) pins from `pin_store`
    pub fn new(
        notes: Vec<Note>,
        owner_id: impl Into<String>,
        pin_store: P,
        config: &SidebarConfig,
        navigator: N,
        palette: C,
    ) -> Result<Self> {
        let owner_id = owner_id.into();
        let pins = PinRegistry::load_or_seed(pin_store, &notes, &owner_id, &config.always_pinned)?;

        let mut sidebar = Self {
            owner_id,
            notes,
            pins,
            grouped: GroupedNotes::default(),
            navigation: NavigationState::new(),
            keymap: KeyMap::default(),
            compact_layout: config.compact_layout,
            fallback_slug: config.fallback_slug.clone(),
            navigator,
            palette,
            notices: Vec::new(),
        };
        sidebar.recompute();
        Ok(sidebar)
    }

    /// Regroup the note list against the current local time
    pub fn recompute(&mut self) {
        self.recompute_at(&Local::now());
    }

    /// Regroup the note list against `now`
    pub fn recompute_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        self.grouped = group_notes(&self.notes, self.pins.pinned(), &self.owner_id, now);
    }

    /// Replace the note list
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.recompute();
    }

    /// Switch to another session
    pub fn set_owner(&mut self, owner_id: impl Into<String>) {
        self.owner_id = owner_id.into();
        self.recompute();
    }

    /// Follow an externally driven route change
    pub fn on_route_change(&mut self, path: &str) {
        self.navigation.select_route(path);
    }

    /// Run `searcher` over the note list and install its outcome
    pub fn search(&mut self, query: &str, searcher: &impl NoteSearch) {
        let results = searcher.search(&self.notes, &self.owner_id, query);
        self.set_search_results(query, results);
    }

    /// Install search results computed elsewhere; `None` returns to browsing
    pub fn set_search_results(&mut self, query: &str, results: Option<Vec<Note>>) {
        self.navigation.set_search_results(query, results);
    }

    /// Leave search mode and return to browsing
    pub fn clear_search(&mut self) {
        self.navigation.clear_search();
    }

    /// Move the selection or the search highlight one step
    pub fn navigate(&mut self, direction: Direction) -> Option<Route> {
        let route = self.navigation.navigate(direction, &self.grouped)?;
        self.go(route.clone());
        Some(route)
    }

    /// Pin or unpin `slug`. Returns whether it is pinned afterwards.
    ///
    /// Clears any search and, on wide layouts, navigates to the note.
    pub fn toggle_pin(&mut self, slug: &str) -> Result<bool> {
        let pinned = self.pins.toggle(slug)?;
        self.navigation.clear_search();
        self.recompute();
        if !self.compact_layout {
            self.go(Route::note(slug));
        }
        Ok(pinned)
    }

    /// Guard a delete request.
    ///
    /// Public notes are refused with a notice. Unknown slugs are ignored.
    pub fn begin_delete(&mut self, slug: &str) -> Option<DeleteTicket> {
        let note = self.find_note(slug)?;
        if note.public {
            tracing::warn!(slug, "Refusing to delete public note");
            self.notices.push(Notice::protected_note());
            return None;
        }

        Some(DeleteTicket {
            slug: note.slug.clone(),
            owner_id: self.owner_id.clone(),
        })
    }

    /// Apply the datastore's answer to a delete.
    ///
    /// The next selection is computed from the grouping as it is now, so
    /// deletes may complete in any order. Returns the route the sidebar moved
    /// to (or would have, on compact layouts).
    pub fn complete_delete(
        &mut self,
        ticket: DeleteTicket,
        outcome: Result<()>,
    ) -> Result<Option<Route>> {
        if let Err(error) = outcome {
            tracing::error!(slug = %ticket.slug, "Failed to delete note: {error}");
            return Err(error);
        }

        let flattened = self.grouped.flatten();
        let next = flattened
            .iter()
            .position(|note| note.slug == ticket.slug)
            .map(|index| {
                let remaining: Vec<&Note> = flattened
                    .iter()
                    .copied()
                    .filter(|note| note.slug != ticket.slug)
                    .collect();
                let next = if index == 0 {
                    remaining.first()
                } else {
                    remaining.get(index - 1)
                };
                next.map_or_else(|| Route::fallback(&self.fallback_slug), |note| note.route())
            });

        self.grouped.remove(&ticket.slug);
        self.notes.retain(|note| note.slug != ticket.slug);
        self.navigation.forget(&ticket.slug);
        tracing::info!(slug = %ticket.slug, "Deleted note");

        if let Some(route) = &next {
            if !self.compact_layout {
                self.go(route.clone());
            }
        }
        Ok(next)
    }

    /// Guard, delete through `store`, and reconcile
    pub async fn delete_note<S: NoteStore>(
        &mut self,
        slug: &str,
        store: &S,
    ) -> Result<Option<Route>> {
        let Some(ticket) = self.begin_delete(slug) else {
            return Ok(None);
        };
        let outcome = store.delete(&ticket.slug, &ticket.owner_id).await;
        self.complete_delete(ticket, outcome)
    }

    /// Dispatch one key press and run its command.
    ///
    /// Datastore failures during a delete are logged and swallowed; pin
    /// persistence failures are returned.
    pub async fn handle_key<S: NoteStore>(
        &mut self,
        input: &KeyInput,
        target: FocusTarget,
        store: &S,
    ) -> Result<KeyOutcome> {
        let outcome = self.keymap.dispatch(input, target);
        let Some(command) = outcome.command else {
            return Ok(outcome);
        };
        tracing::debug!(key = %input, ?command, "Running key command");

        match command {
            Command::Navigate(direction) => {
                self.navigate(direction);
            }
            Command::TogglePin => {
                if let Some(slug) = self.highlighted_slug() {
                    self.toggle_pin(&slug)?;
                }
            }
            Command::Delete => {
                if let Some(slug) = self.highlighted_slug() {
                    // already logged by complete_delete
                    let _ = self.delete_note(&slug, store).await;
                }
            }
            Command::FocusSearch => {}
            Command::OpenCommandPalette => self.palette.open(),
        }

        Ok(outcome)
    }

    /// Note the shortcuts act on
    #[must_use]
    pub fn highlighted_note(&self) -> Option<&Note> {
        self.navigation.highlighted_note(&self.notes)
    }

    /// Current category grouping
    #[must_use]
    pub fn grouped(&self) -> &GroupedNotes {
        &self.grouped
    }

    /// Every known note, visible or not
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub const fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    #[must_use]
    pub const fn pins(&self) -> &PinRegistry<P> {
        &self.pins
    }

    /// Session the sidebar is scoped to
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    #[must_use]
    pub fn selected_slug(&self) -> Option<&str> {
        self.navigation.selected_slug()
    }

    /// Key bindings, for registering extra shortcuts
    pub fn keymap_mut(&mut self) -> &mut KeyMap {
        &mut self.keymap
    }

    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    #[must_use]
    pub const fn palette(&self) -> &C {
        &self.palette
    }

    /// Pending notices, oldest first
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand pending notices to the shell
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn highlighted_slug(&self) -> Option<String> {
        self.highlighted_note().map(|note| note.slug.clone())
    }

    fn find_note(&self, slug: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.slug == slug).or_else(|| {
            match self.navigation.mode() {
                SearchMode::Searching { results, .. } => {
                    results.iter().find(|note| note.slug == slug)
                }
                SearchMode::Browsing => None,
            }
        })
    }

    fn go(&mut self, route: Route) {
        self.navigation.select_route(route.as_str());
        self.navigator.push(route);
    }
}
