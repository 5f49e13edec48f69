//! Note datastore port and its implementations.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

use crate::db::{Database, NoteRepository, SqliteNoteRepository};
use crate::error::{Error, Result};
use crate::models::Note;

/// Remote or local datastore the sidebar deletes through
#[allow(async_fn_in_trait)]
pub trait NoteStore {
    /// Delete `slug`, scoped to notes owned by `owner_id`
    async fn delete(&self, slug: &str, owner_id: &str) -> Result<()>;
}

/// Thread-safe note store over a `SQLite` database
#[derive(Clone)]
pub struct SqliteNoteStore {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl SqliteNoteStore {
    /// Open (or create) the database at `db_path`
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let db = Database::open(&db_path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory store (primarily for tests)
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Path of the backing database file, if any
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// List every note, newest first
    pub async fn list(&self) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        let repo = SqliteNoteRepository::new(db.connection());
        repo.list()
    }

    /// Fetch a note by slug
    pub async fn get(&self, slug: &str) -> Result<Option<Note>> {
        let db = self.db.lock().await;
        let repo = SqliteNoteRepository::new(db.connection());
        repo.get(slug)
    }

    /// Insert a new note
    pub async fn add(&self, note: &Note) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteNoteRepository::new(db.connection());
        repo.create(note)?;
        tracing::info!(slug = %note.slug, "Added note");
        Ok(())
    }
}

impl NoteStore for SqliteNoteStore {
    async fn delete(&self, slug: &str, owner_id: &str) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteNoteRepository::new(db.connection());
        repo.delete(slug, owner_id)
    }
}

/// In-memory note store that records every delete request
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    notes: Arc<StdMutex<Vec<Note>>>,
    deletes: Arc<StdMutex<Vec<(String, String)>>>,
    failure: Arc<StdMutex<Option<String>>>,
}

impl MemoryNoteStore {
    /// Store seeded with `notes`
    #[must_use]
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes: Arc::new(StdMutex::new(notes)),
            ..Self::default()
        }
    }

    /// Make every following delete fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message.into());
        }
    }

    /// Notes still stored
    #[must_use]
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().map(|notes| notes.clone()).unwrap_or_default()
    }

    /// Every `(slug, owner_id)` delete request received, in order
    #[must_use]
    pub fn deletes(&self) -> Vec<(String, String)> {
        self.deletes
            .lock()
            .map(|deletes| deletes.clone())
            .unwrap_or_default()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::Database("note store lock poisoned".to_string())
}

impl NoteStore for MemoryNoteStore {
    async fn delete(&self, slug: &str, owner_id: &str) -> Result<()> {
        self.deletes
            .lock()
            .map_err(poisoned)?
            .push((slug.to_string(), owner_id.to_string()));

        if let Some(message) = self.failure.lock().map_err(poisoned)?.clone() {
            return Err(Error::Database(message));
        }

        let mut notes = self.notes.lock().map_err(poisoned)?;
        let before = notes.len();
        notes.retain(|note| !(note.slug == slug && note.is_owned_by(owner_id)));
        if notes.len() == before {
            return Err(Error::NotFound(slug.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_store_add_list_delete() {
        let store = SqliteNoteStore::open_in_memory().unwrap();
        let note = Note::new("groceries", "session-a", "milk").unwrap();
        store.add(&note).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec![note.clone()]);
        assert!(store.delete("groceries", "session-b").await.is_err());

        store.delete("groceries", "session-a").await.unwrap();
        assert!(store.get("groceries").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_to_disk() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("notes.db");

        {
            let store = SqliteNoteStore::open_path(&path).unwrap();
            assert_eq!(store.db_path(), Some(path.as_path()));
            store
                .add(&Note::new("kept", "session-a", "").unwrap())
                .await
                .unwrap();
        }

        let reopened = SqliteNoteStore::open_path(&path).unwrap();
        let slugs: Vec<String> = reopened
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|note| note.slug)
            .collect();
        assert_eq!(slugs, vec!["kept"]);
    }

    #[tokio::test]
    async fn test_memory_store_records_and_fails() {
        let store = MemoryNoteStore::new(vec![Note::new("a", "me", "").unwrap()]);
        store.delete("a", "me").await.unwrap();
        assert!(store.notes().is_empty());

        store.fail_with("offline");
        let err = store.delete("b", "me").await.unwrap_err();
        assert!(matches!(err, Error::Database(message) if message == "offline"));
        assert_eq!(
            store.deletes(),
            vec![
                ("a".to_string(), "me".to_string()),
                ("b".to_string(), "me".to_string())
            ]
        );
    }
}
