//! sidenote-core - Core library for sidenote
//!
//! This crate contains the note models, the recency/pin grouping, the
//! navigation and keyboard state machines, and the sidebar controller that
//! ties them to the datastore, router and command palette ports.

pub mod config;
pub mod db;
pub mod error;
pub mod grouping;
pub mod keyboard;
pub mod models;
pub mod navigation;
pub mod notice;
pub mod pins;
pub mod ports;
pub mod search;
pub mod sidebar;
pub mod store;
pub mod util;

pub use config::SidebarConfig;
pub use error::{Error, Result};
pub use grouping::{group_notes, GroupedNotes};
pub use keyboard::{Command, FocusTarget, KeyInput, KeyMap, KeyOutcome};
pub use models::{Category, Note, Route};
pub use navigation::{Direction, NavigationState, SearchMode};
pub use notice::{Notice, NoticeLevel};
pub use pins::{JsonFilePinStore, MemoryPinStore, PinRegistry, PinStore};
pub use ports::{CommandPalette, Navigator};
pub use search::{NoteSearch, SubstringSearch};
pub use sidebar::{DeleteTicket, Sidebar};
pub use store::{MemoryNoteStore, NoteStore, SqliteNoteStore};
