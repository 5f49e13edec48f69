//! Pinned-note registry and its persistence port.
//!
//! The registry keeps the set of pinned slugs in memory and writes the whole
//! set through a [`PinStore`] on every change. Stores only ever see complete
//! snapshots.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::models::Note;

/// Default file name for the JSON pin store
pub const PINS_FILE_NAME: &str = "pinned-notes.json";

/// Read-all / write-all storage for the pinned slug set
pub trait PinStore {
    /// Load the persisted slugs, `None` when nothing was ever saved
    fn load(&self) -> Result<Option<Vec<String>>>;

    /// Replace the persisted value with `slugs`
    fn save(&self, slugs: &[String]) -> Result<()>;

    /// Move an unreadable persisted value out of the way
    fn quarantine(&self) -> Result<()>;
}

/// Pin store backed by a single JSON array file
#[derive(Debug, Clone)]
pub struct JsonFilePinStore {
    path: PathBuf,
}

impl JsonFilePinStore {
    /// Store pins at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the pins file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PinStore for JsonFilePinStore {
    fn load(&self) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)?;
        parse_pins(&raw).map(Some)
    }

    fn save(&self, slugs: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string(slugs)?;
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn quarantine(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut backup_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        backup_name.push(format!(".corrupt-{timestamp}"));
        let backup_path = self.path.with_file_name(backup_name);

        std::fs::rename(&self.path, &backup_path)?;
        tracing::warn!(
            "Moved corrupt pins file from {} to {}",
            self.path.display(),
            backup_path.display()
        );
        Ok(())
    }
}

/// In-memory pin store; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemoryPinStore {
    raw: Arc<Mutex<Option<String>>>,
    snapshots: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MemoryPinStore {
    /// Empty store, as on a first launch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds a raw serialized value
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.raw.lock() {
            *guard = Some(raw.into());
        }
        store
    }

    /// Raw serialized value currently held
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|guard| guard.clone())
    }

    /// Every snapshot saved so far, oldest first
    #[must_use]
    pub fn snapshots(&self) -> Vec<Vec<String>> {
        self.snapshots
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl PinStore for MemoryPinStore {
    fn load(&self) -> Result<Option<Vec<String>>> {
        match self.raw() {
            Some(raw) => parse_pins(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, slugs: &[String]) -> Result<()> {
        let serialized = serde_json::to_string(slugs)?;
        let mut raw = self
            .raw
            .lock()
            .map_err(|error| Error::Database(error.to_string()))?;
        *raw = Some(serialized);
        drop(raw);

        self.snapshots
            .lock()
            .map_err(|error| Error::Database(error.to_string()))?
            .push(slugs.to_vec());
        Ok(())
    }

    fn quarantine(&self) -> Result<()> {
        *self
            .raw
            .lock()
            .map_err(|error| Error::Database(error.to_string()))? = None;
        Ok(())
    }
}

fn parse_pins(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw).map_err(|error| Error::CorruptPinData(error.to_string()))
}

/// The set of pinned slugs, kept in sync with a [`PinStore`]
#[derive(Debug)]
pub struct PinRegistry<S: PinStore> {
    store: S,
    pinned: BTreeSet<String>,
}

impl<S: PinStore> PinRegistry<S> {
    /// Load the persisted set, or seed and persist one on first use.
    ///
    /// The seed is every note in `always_pinned` that exists in `notes` plus
    /// every note owned by `owner_id`. Corrupt persisted data is quarantined
    /// and replaced by a fresh seed.
    pub fn load_or_seed(
        store: S,
        notes: &[Note],
        owner_id: &str,
        always_pinned: &[String],
    ) -> Result<Self> {
        let loaded = match store.load() {
            Ok(loaded) => loaded,
            Err(Error::CorruptPinData(reason)) => {
                tracing::warn!("Ignoring unreadable pinned notes ({reason}); reseeding");
                store.quarantine()?;
                None
            }
            Err(error) => return Err(error),
        };

        if let Some(slugs) = loaded {
            tracing::debug!("Loaded {} pinned notes", slugs.len());
            return Ok(Self {
                store,
                pinned: slugs.into_iter().collect(),
            });
        }

        let pinned: BTreeSet<String> = notes
            .iter()
            .filter(|note| always_pinned.contains(&note.slug) || note.is_owned_by(owner_id))
            .map(|note| note.slug.clone())
            .collect();

        let registry = Self { store, pinned };
        registry.persist(&registry.pinned)?;
        tracing::info!("Seeded {} pinned notes", registry.pinned.len());
        Ok(registry)
    }

    /// Flip membership of `slug`, persisting the full set first.
    ///
    /// Returns whether the slug is pinned afterwards. When the write fails
    /// the in-memory set is left untouched.
    pub fn toggle(&mut self, slug: &str) -> Result<bool> {
        let mut next = self.pinned.clone();
        let now_pinned = if next.remove(slug) {
            false
        } else {
            next.insert(slug.to_string());
            true
        };

        self.persist(&next)?;
        self.pinned = next;
        tracing::debug!(slug, pinned = now_pinned, "Toggled pin");
        Ok(now_pinned)
    }

    /// Whether `slug` is pinned
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.pinned.contains(slug)
    }

    /// Current pinned set
    #[must_use]
    pub const fn pinned(&self) -> &BTreeSet<String> {
        &self.pinned
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self, pinned: &BTreeSet<String>) -> Result<()> {
        let snapshot: Vec<String> = pinned.iter().cloned().collect();
        self.store.save(&snapshot)
    }
}
