use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] sidenote_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note slug cannot be empty")]
    EmptySlug,
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    Refused(String),
}
