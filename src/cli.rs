//! CLI - Command Line Interface for MovieDeck
//!
//! Every catalog and favorites action of the TUI is scriptable. With `--json`
//! (or when stdout is not a terminal) output is wrapped in a JSON envelope.
//!
//! # Examples
//!
//! ```bash
//! moviedeck popular --limit 5
//! moviedeck search "blade runner" --json
//! moviedeck info 27205
//! moviedeck toggle 27205
//! moviedeck favorites --ids
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{MovieId, MovieRecord};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// General error
    Error = 1,
    InvalidArgs = 2,
    /// Catalog unreachable or failing
    NetworkError = 3,
    /// Catalog has no such movie
    NotFound = 4,
    /// Favorites could not be written
    StorageError = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// MovieDeck - browse TMDB movies and keep a list of favorites
///
/// Run without arguments to launch the interactive TUI.
#[derive(Parser, Debug)]
#[command(
    name = "moviedeck",
    version,
    about = "Browse TMDB movies from the terminal and keep favorites",
    long_about = "Browse popular movies, search the catalog, read details and keep a \
                  locally stored list of favorites.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  moviedeck                         Launch interactive TUI\n\
                  moviedeck search \"alien\"          Search the catalog\n\
                  moviedeck toggle 27205            Add or remove a favorite\n\
                  moviedeck favorites --json        List favorites as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List popular movies
    #[command(visible_alias = "p")]
    Popular(PopularCmd),

    /// Search movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show details for one movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List favorite movies
    #[command(visible_alias = "fav")]
    Favorites(FavoritesCmd),

    /// Add a movie to favorites, or remove it if already there
    #[command(visible_alias = "t")]
    Toggle(ToggleCmd),
}

#[derive(Args, Debug)]
pub struct PopularCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB movie ID (e.g., 27205)
    pub id: String,
}

#[derive(Args, Debug)]
pub struct FavoritesCmd {
    /// Print stored ids only, without contacting the catalog
    #[arg(long)]
    pub ids: bool,
}

#[derive(Args, Debug)]
pub struct ToggleCmd {
    /// TMDB movie ID
    pub id: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Movie with its favorite flag, as listed by the CLI
#[derive(Debug, Serialize)]
pub struct MovieEntry<'a> {
    #[serde(flatten)]
    pub movie: &'a MovieRecord,
    pub favorite: bool,
}

/// Result of `toggle`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ToggleResponse {
    pub id: MovieId,
    pub favorite: bool,
    /// Full set after the toggle
    pub favorites: Vec<MovieId>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print `data` in the JSON envelope, or `human` for terminals
    pub fn print<T: Serialize>(&self, data: T, human: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(data))?);
        } else {
            println!("{}", human());
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet and JSON mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Argument Validation
// =============================================================================

/// Parse a movie id argument (digits, surrounding whitespace allowed)
pub fn parse_movie_id(raw: &str) -> Result<MovieId, String> {
    raw.parse::<MovieId>()
        .map_err(|_| format!("Invalid movie ID {:?} (expected a non-negative integer)", raw))
}

// =============================================================================
// Tests
// =============================================================================
