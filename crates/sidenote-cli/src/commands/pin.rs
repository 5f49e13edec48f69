use std::io::Write;

use crate::commands::common::{ensure_listed, normalize_slug, Session};
use crate::error::CliError;

pub async fn run_pin(session: &Session, slug: &str, out: &mut impl Write) -> Result<(), CliError> {
    let slug = normalize_slug(slug)?;
    let mut sidebar = session.sidebar().await?;
    ensure_listed(&sidebar, &slug)?;

    let pinned = sidebar.toggle_pin(&slug)?;
    let state = if pinned { "pinned" } else { "unpinned" };
    writeln!(out, "{state} {slug}")?;
    Ok(())
}
