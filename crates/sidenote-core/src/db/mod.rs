//! Database layer for sidenote

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{NoteRepository, SqliteNoteRepository};
