use std::io::Write;

use sidenote_core::util::normalize_text_option;
use sidenote_core::Note;

use crate::commands::common::{normalize_slug, resolve_note_content, Session};
use crate::error::CliError;

pub async fn run_add(
    session: &Session,
    slug: &str,
    title: Option<String>,
    public: bool,
    content_parts: &[String],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let slug = normalize_slug(slug)?;
    let content = resolve_note_content(content_parts)?;

    let mut note = Note::new(slug, session.owner_id.clone(), content)?.with_public(public);
    if let Some(title) = normalize_text_option(title) {
        note = note.with_title(title);
    }

    session.store.add(&note).await?;
    writeln!(out, "{}", note.route())?;
    Ok(())
}
