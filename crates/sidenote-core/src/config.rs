//! Persistent sidebar configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ABOUT_ME_SLUG;
use crate::pins::PINS_FILE_NAME;
use crate::util::{normalize_text_list, normalize_text_option};

const APP_DIR_NAME: &str = "sidenote";
const CONFIG_FILE_NAME: &str = "config.json";
const DB_FILE_NAME: &str = "sidenote.db";

/// Slugs pinned on first load when they exist
pub const DEFAULT_ALWAYS_PINNED: [&str; 2] = [ABOUT_ME_SLUG, "quick-links"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidebarConfig {
    /// Session id of the current author
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default = "default_always_pinned")]
    pub always_pinned: Vec<String>,
    /// Route target when nothing else is selectable
    #[serde(default = "default_fallback_slug")]
    pub fallback_slug: String,
    /// Compact (mobile) layouts never navigate after pin or delete
    #[serde(default)]
    pub compact_layout: bool,
    #[serde(default)]
    pub pins_path: Option<PathBuf>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

fn default_always_pinned() -> Vec<String> {
    DEFAULT_ALWAYS_PINNED.iter().map(ToString::to_string).collect()
}

fn default_fallback_slug() -> String {
    ABOUT_ME_SLUG.to_string()
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            always_pinned: default_always_pinned(),
            fallback_slug: default_fallback_slug(),
            compact_layout: false,
            pins_path: None,
            db_path: None,
        }
    }
}

/// `<config_dir>/sidenote`
pub fn default_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| Error::InvalidInput("Failed to resolve config directory".to_string()))
}

/// `<config_dir>/sidenote/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_config_dir()?.join(CONFIG_FILE_NAME))
}

impl SidebarConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&default_config_path()?)
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::InvalidInput(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    /// Write the normalized config to `path`, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Pin file location, defaulting next to the config file
    pub fn pins_path(&self) -> Result<PathBuf> {
        match &self.pins_path {
            Some(path) => Ok(path.clone()),
            None => Ok(default_config_dir()?.join(PINS_FILE_NAME)),
        }
    }

    /// Database location, defaulting to the platform data directory
    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
            .ok_or_else(|| Error::InvalidInput("Failed to resolve data directory".to_string()))
    }

    /// Overlay a session id from a flag or the environment
    pub fn override_session(&mut self, session_id: Option<String>) {
        if let Some(session_id) = normalize_text_option(session_id) {
            self.session_id = Some(session_id);
        }
    }

    /// Current session id, issuing and storing one with `issue` if missing.
    ///
    /// Returns the id and whether it was newly issued.
    pub fn ensure_session_id(&mut self, issue: impl FnOnce() -> String) -> (String, bool) {
        if let Some(session_id) = normalize_text_option(self.session_id.clone()) {
            return (session_id, false);
        }
        let session_id = issue();
        tracing::info!("Issued new session id");
        self.session_id = Some(session_id.clone());
        (session_id, true)
    }

    fn normalize(&mut self) {
        self.session_id = normalize_text_option(self.session_id.take());
        self.always_pinned = normalize_text_list(&self.always_pinned);
        self.fallback_slug = normalize_text_option(Some(std::mem::take(&mut self.fallback_slug)))
            .unwrap_or_else(default_fallback_slug);
        self.pins_path = self.pins_path.take().filter(|path| !path.as_os_str().is_empty());
        self.db_path = self.db_path.take().filter(|path| !path.as_os_str().is_empty());
    }
}
