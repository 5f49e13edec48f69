use std::io::Write;

use sidenote_core::{Command, Direction, FocusTarget, KeyInput, KeyOutcome, Route, SubstringSearch};

use crate::commands::common::{normalize_slug, CliSidebar, Session};
use crate::error::CliError;

pub async fn run_keys(
    session: &Session,
    at: Option<&str>,
    search: Option<&str>,
    keys: &[String],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut sidebar = session.sidebar().await?;
    if let Some(at) = at {
        sidebar.on_route_change(Route::note(&normalize_slug(at)?).as_str());
    }
    if let Some(query) = search {
        sidebar.search(query, &SubstringSearch);
    }

    let mut focus = FocusTarget::Other;
    for raw in keys {
        let input: KeyInput = raw.parse()?;
        let routes_before = sidebar.navigator().routes().len();
        let palette_before = sidebar.palette().open_count();

        let outcome = sidebar.handle_key(&input, focus, &session.store).await?;
        if outcome.blur {
            focus = FocusTarget::Other;
        }
        if outcome.focus_search {
            focus = FocusTarget::TextInput;
        }

        writeln!(out, "{:<8} {}", input.to_string(), describe_outcome(&outcome))?;
        for route in sidebar.navigator().routes().into_iter().skip(routes_before) {
            writeln!(out, "  -> {route}")?;
        }
        if sidebar.palette().open_count() > palette_before {
            writeln!(out, "  palette opened")?;
        }
        for notice in sidebar.take_notices() {
            writeln!(out, "  ! {notice}")?;
        }
        if let Some(line) = describe_highlight(&sidebar) {
            writeln!(out, "  {line}")?;
        }
    }

    Ok(())
}

pub fn describe_outcome(outcome: &KeyOutcome) -> String {
    if !outcome.is_handled() {
        return "ignored".to_string();
    }

    let mut parts = Vec::new();
    if let Some(command) = outcome.command {
        parts.push(describe_command(command));
    }
    if outcome.prevent_default {
        parts.push("prevent-default");
    }
    if outcome.blur {
        parts.push("blur");
    }
    parts.join(" ")
}

const fn describe_command(command: Command) -> &'static str {
    match command {
        Command::Navigate(Direction::Up) => "navigate-up",
        Command::Navigate(Direction::Down) => "navigate-down",
        Command::TogglePin => "toggle-pin",
        Command::Delete => "delete",
        Command::FocusSearch => "focus-search",
        Command::OpenCommandPalette => "open-palette",
    }
}

fn describe_highlight(sidebar: &CliSidebar) -> Option<String> {
    let index = sidebar.navigation().highlight_index()?;
    let slug = sidebar.highlighted_note().map_or("-", |note| note.slug.as_str());
    Some(format!("highlight {index}: {slug}"))
}
