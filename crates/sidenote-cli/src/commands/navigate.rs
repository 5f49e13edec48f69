use std::io::Write;

use sidenote_core::{Direction, Route};

use crate::commands::common::{ensure_listed, normalize_slug, Session};
use crate::error::CliError;

pub async fn run_navigate(
    session: &Session,
    slug: &str,
    direction: Direction,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let slug = normalize_slug(slug)?;
    let mut sidebar = session.sidebar().await?;
    ensure_listed(&sidebar, &slug)?;
    sidebar.on_route_change(Route::note(&slug).as_str());

    if let Some(route) = sidebar.navigate(direction) {
        writeln!(out, "{route}")?;
    }
    Ok(())
}
