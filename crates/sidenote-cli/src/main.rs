//! sidenote CLI - drive the notes sidebar from the terminal
//!
//! Lists notes in their pinned and recency groups, toggles pins, deletes
//! notes and replays keyboard shortcuts against the same core the UI uses.

mod cli;
mod commands;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::{open_session, GlobalArgs};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::keys::run_keys;
use crate::commands::list::run_list;
use crate::commands::navigate::run_navigate;
use crate::commands::pin::run_pin;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sidenote=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = GlobalArgs {
        config: cli.config,
        db_path: cli.db_path,
        session: cli.session,
    };

    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let session = open_session(&global)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::List { json } => run_list(&session, json, &mut out).await?,
        Commands::Add {
            slug,
            title,
            public,
            content,
        } => run_add(&session, &slug, title, public, &content, &mut out).await?,
        Commands::Pin { slug } => run_pin(&session, &slug, &mut out).await?,
        Commands::Delete { slug } => run_delete(&session, &slug, &mut out).await?,
        Commands::Navigate { slug, direction } => {
            run_navigate(&session, &slug, direction.into(), &mut out).await?;
        }
        Commands::Keys { at, search, keys } => {
            run_keys(&session, at.as_deref(), search.as_deref(), &keys, &mut out).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
