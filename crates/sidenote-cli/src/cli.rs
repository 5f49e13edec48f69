use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sidenote_core::Direction;

#[derive(Parser)]
#[command(name = "sidenote")]
#[command(about = "Browse, pin and delete notes from a keyboard-driven sidebar")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Session id to act as (overrides SIDENOTE_SESSION and the config file)
    #[arg(long, global = true, value_name = "ID")]
    pub session: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show notes grouped by pinned status and recency
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Unique note slug (lowercase letters, digits and dashes)
        slug: String,
        /// Display title (defaults to the slug)
        #[arg(long)]
        title: Option<String>,
        /// Make the note visible to every session
        #[arg(long)]
        public: bool,
        /// Note content (read from stdin when omitted)
        content: Vec<String>,
    },
    /// Pin or unpin a note
    Pin {
        slug: String,
    },
    /// Delete a note and print the route selected afterwards
    Delete {
        slug: String,
    },
    /// Print the route one step up or down from a note
    Navigate {
        slug: String,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Replay key strokes through the sidebar shortcuts
    Keys {
        /// Slug selected before the first key
        #[arg(long, value_name = "SLUG")]
        at: Option<String>,
        /// Search query active before the first key
        #[arg(long, value_name = "QUERY")]
        search: Option<String>,
        /// Keys such as j, k, p, d, /, esc, up, down, ctrl+k
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
