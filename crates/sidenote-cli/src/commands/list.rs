use std::io::Write;

use crate::commands::common::{format_group_lines, group_items, now_ms, Session};
use crate::error::CliError;

pub async fn run_list(session: &Session, as_json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let sidebar = session.sidebar().await?;
    let now_ms = now_ms();

    if as_json {
        let groups = group_items(sidebar.grouped(), &session.owner_id, now_ms);
        writeln!(out, "{}", serde_json::to_string_pretty(&groups)?)?;
    } else if sidebar.grouped().is_empty() {
        writeln!(out, "No notes yet")?;
    } else {
        for line in format_group_lines(sidebar.grouped(), None, now_ms) {
            writeln!(out, "{line}")?;
        }
    }

    Ok(())
}
