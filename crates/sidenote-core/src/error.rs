//! Error types for sidenote-core

use thiserror::Error;

/// Result type alias using sidenote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sidenote-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted pin data exists but is not a JSON array of slugs
    #[error("Corrupt pinned-notes data: {0}")]
    CorruptPinData(String),
}
