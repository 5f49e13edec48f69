use std::io::Write;

use sidenote_core::Route;

use crate::commands::common::{ensure_listed, normalize_slug, notices_to_error, Session};
use crate::error::CliError;

pub async fn run_delete(session: &Session, slug: &str, out: &mut impl Write) -> Result<(), CliError> {
    let slug = normalize_slug(slug)?;
    let mut sidebar = session.sidebar().await?;
    ensure_listed(&sidebar, &slug)?;
    sidebar.on_route_change(Route::note(&slug).as_str());

    let next = sidebar.delete_note(&slug, &session.store).await?;
    notices_to_error(sidebar.take_notices())?;

    let next = next.ok_or(CliError::NoteNotFound(slug))?;
    writeln!(out, "{next}")?;
    Ok(())
}
