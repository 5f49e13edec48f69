//! Note model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Slug of the note every client falls back to when nothing else is selectable
pub const ABOUT_ME_SLUG: &str = "about-me";

/// A note as the sidebar sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique, URL-safe identifier
    pub slug: String,
    /// Session id of the author
    pub owner_id: String,
    /// Public notes are visible to every session and cannot be deleted
    pub public: bool,
    /// Display title
    pub title: String,
    /// Plain text content
    pub content: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl Note {
    /// Create a private note owned by `owner_id`, stamped with the current time
    pub fn new(
        slug: impl Into<String>,
        owner_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self {
            title: slug.replace('-', " "),
            slug,
            owner_id: owner_id.into(),
            public: false,
            content: content.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Set the display title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Mark the note as public
    #[must_use]
    pub const fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Override the creation timestamp (Unix ms)
    #[must_use]
    pub const fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether `owner_id` is allowed to see this note in its sidebar
    #[must_use]
    pub fn is_visible_to(&self, owner_id: &str) -> bool {
        self.public || self.owner_id == owner_id
    }

    /// Whether this note was written by `owner_id`
    #[must_use]
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// Get first line as title preview, truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        let source = if self.title.trim().is_empty() {
            self.content.lines().next().unwrap_or("")
        } else {
            self.title.as_str()
        };
        source.trim().chars().take(max_len).collect()
    }

    /// Route that shows this note
    #[must_use]
    pub fn route(&self) -> Route {
        Route::note(&self.slug)
    }
}

/// Check that a slug is lowercase ASCII letters, digits and dashes
///
/// # Examples
///
/// ```
/// use sidenote_core::models::validate_slug;
///
/// assert!(validate_slug("quick-links").is_ok());
/// assert!(validate_slug("Quick Links").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<()> {
    static SLUG_RE: OnceLock<Regex> = OnceLock::new();
    let re = SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("Invalid regex"));

    if re.is_match(slug) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("invalid note slug: {slug:?}")))
    }
}

/// A location in the notes app, always of the form `/{slug}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route(String);

impl Route {
    /// Route to the note with the given slug
    #[must_use]
    pub fn note(slug: &str) -> Self {
        Self(format!("/{slug}"))
    }

    /// Route used when there is nothing left to select
    #[must_use]
    pub fn fallback(slug: &str) -> Self {
        Self::note(slug)
    }

    /// Extract the selected slug from a route path (its final segment).
    ///
    /// A trailing slash leaves an empty final segment, meaning no selection.
    #[must_use]
    pub fn slug_from_path(path: &str) -> Option<String> {
        path.rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    }

    /// Slug this route points at
    #[must_use]
    pub fn slug(&self) -> &str {
        self.0.trim_start_matches('/')
    }

    /// Raw route path
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
