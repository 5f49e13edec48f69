//! Note repository implementation

use crate::error::{Error, Result};
use crate::models::Note;
use rusqlite::{params, Connection};

/// Trait for note storage operations
pub trait NoteRepository {
    /// Insert a new note
    fn create(&self, note: &Note) -> Result<()>;

    /// Get a note by slug
    fn get(&self, slug: &str) -> Result<Option<Note>>;

    /// List every note, newest first
    fn list(&self) -> Result<Vec<Note>>;

    /// Delete a note owned by `owner_id`
    fn delete(&self, slug: &str, owner_id: &str) -> Result<()>;
}

/// `SQLite` implementation of `NoteRepository`
pub struct SqliteNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
        Ok(Note {
            slug: row.get(0)?,
            owner_id: row.get(1)?,
            public: row.get::<_, i32>(2)? != 0,
            title: row.get(3)?,
            content: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create(&self, note: &Note) -> Result<()> {
        let result = self.conn.execute(
            "INSERT INTO notes (slug, owner_id, public, title, content, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                note.slug,
                note.owner_id,
                i32::from(note.public),
                note.title,
                note.content,
                note.created_at
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::InvalidInput(format!(
                    "a note with slug {:?} already exists",
                    note.slug
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, slug: &str) -> Result<Option<Note>> {
        let result = self.conn.query_row(
            "SELECT slug, owner_id, public, title, content, created_at FROM notes WHERE slug = ?",
            params![slug],
            Self::parse_note,
        );

        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT slug, owner_id, public, title, content, created_at
             FROM notes
             ORDER BY created_at DESC, slug ASC",
        )?;

        let notes = stmt
            .query_map([], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    fn delete(&self, slug: &str, owner_id: &str) -> Result<()> {
        let rows = self.conn.execute(
            "DELETE FROM notes WHERE slug = ? AND owner_id = ?",
            params![slug, owner_id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(slug.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn note(slug: &str, owner: &str, created_at: i64) -> Note {
        Note::new(slug, owner, format!("content of {slug}"))
            .unwrap()
            .with_created_at(created_at)
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let created = note("hello-world", "session-a", 1_000).with_public(true);
        repo.create(&created).unwrap();

        let fetched = repo.get("hello-world").unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_duplicate_slug() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        repo.create(&note("dup", "session-a", 1)).unwrap();
        let err = repo.create(&note("dup", "session-b", 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        repo.create(&note("old", "s", 1_000)).unwrap();
        repo.create(&note("new", "s", 3_000)).unwrap();
        repo.create(&note("mid", "s", 2_000)).unwrap();

        let slugs: Vec<String> = repo.list().unwrap().into_iter().map(|n| n.slug).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_delete_is_scoped_by_owner() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        repo.create(&note("mine", "session-a", 1)).unwrap();

        let err = repo.delete("mine", "session-b").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(repo.get("mine").unwrap().is_some());

        repo.delete("mine", "session-a").unwrap();
        assert!(repo.get("mine").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing() {
        let db = setup();
        let repo = SqliteNoteRepository::new(db.connection());

        let result = repo.delete("nothing-here", "session-a");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
