use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use sidenote_core::config::default_config_path;
use sidenote_core::ports::{RecordingNavigator, RecordingPalette};
use sidenote_core::{
    Category, GroupedNotes, JsonFilePinStore, Note, Notice, Sidebar, SidebarConfig,
    SqliteNoteStore,
};
use uuid::Uuid;

use crate::error::CliError;

/// Environment variable holding the session id
pub const SESSION_ENV: &str = "SIDENOTE_SESSION";

pub type CliSidebar = Sidebar<JsonFilePinStore, RecordingNavigator, RecordingPalette>;

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub session: Option<String>,
}

/// Resolved configuration, identity and storage for one invocation
pub struct Session {
    pub config: SidebarConfig,
    pub owner_id: String,
    pub pins_path: PathBuf,
    pub store: SqliteNoteStore,
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub slug: String,
    pub title: String,
    pub public: bool,
    pub owned: bool,
    pub created_at: i64,
    pub relative_time: String,
}

#[derive(Debug, Serialize)]
pub struct GroupItem {
    pub category: Category,
    pub label: &'static str,
    pub notes: Vec<NoteListItem>,
}

pub fn open_session(args: &GlobalArgs) -> Result<Session, CliError> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = SidebarConfig::load_from_path(&config_path)?;
    config.override_session(env::var(SESSION_ENV).ok());
    config.override_session(args.session.clone());

    let (owner_id, issued) = config.ensure_session_id(|| Uuid::now_v7().to_string());
    if issued {
        config.save_to_path(&config_path)?;
        tracing::info!("Saved new session id to {}", config_path.display());
    }

    let db_path = match &args.db_path {
        Some(path) => path.clone(),
        None => config.db_path()?,
    };
    let pins_path = config.pins_path()?;
    let store = SqliteNoteStore::open_path(db_path)?;

    Ok(Session {
        config,
        owner_id,
        pins_path,
        store,
    })
}

impl Session {
    /// Sidebar over every stored note, with pins loaded from disk
    pub async fn sidebar(&self) -> Result<CliSidebar, CliError> {
        let notes = self.store.list().await?;
        Ok(Sidebar::new(
            notes,
            self.owner_id.clone(),
            JsonFilePinStore::new(&self.pins_path),
            &self.config,
            RecordingNavigator::new(),
            RecordingPalette::new(),
        )?)
    }
}

/// Fail unless `slug` is listed in the sidebar
pub fn ensure_listed(sidebar: &CliSidebar, slug: &str) -> Result<(), CliError> {
    if sidebar.grouped().find(slug).is_some() {
        Ok(())
    } else {
        Err(CliError::NoteNotFound(slug.to_string()))
    }
}

/// Turn pending notices into an error for the first one, if any
pub fn notices_to_error(notices: Vec<Notice>) -> Result<(), CliError> {
    match notices.into_iter().next() {
        Some(notice) => Err(CliError::Refused(notice.message)),
        None => Ok(()),
    }
}

pub fn group_items(grouped: &GroupedNotes, owner_id: &str, now_ms: i64) -> Vec<GroupItem> {
    grouped
        .iter()
        .map(|(category, notes)| GroupItem {
            category,
            label: category.label(),
            notes: notes
                .iter()
                .map(|note| note_to_list_item(note, owner_id, now_ms))
                .collect(),
        })
        .collect()
}

pub fn note_to_list_item(note: &Note, owner_id: &str, now_ms: i64) -> NoteListItem {
    NoteListItem {
        slug: note.slug.clone(),
        title: note.title_preview(80),
        public: note.public,
        owned: note.is_owned_by(owner_id),
        created_at: note.created_at,
        relative_time: format_relative_time(note.created_at, now_ms),
    }
}

pub fn format_group_lines(grouped: &GroupedNotes, selected: Option<&str>, now_ms: i64) -> Vec<String> {
    let mut lines = Vec::new();
    for (category, notes) in grouped.iter() {
        lines.push(category.label().to_string());
        for note in notes {
            let marker = if selected == Some(note.slug.as_str()) {
                '>'
            } else {
                ' '
            };
            let title = note.title_preview(30);
            let relative_time = format_relative_time(note.created_at, now_ms);
            let line = format!("{marker} {:<24}  {title:<30}  {relative_time}", note.slug);
            if note.public {
                lines.push(format!("{line}  [public]"));
            } else {
                lines.push(line);
            }
        }
    }
    lines
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_slug(slug: &str) -> Result<String, CliError> {
    let trimmed = slug.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        Err(CliError::EmptySlug)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}
