//! MovieDeck - browse TMDB movies from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! moviedeck
//!
//! # CLI mode (for automation)
//! moviedeck search "blade runner"
//! moviedeck toggle 78
//! moviedeck favorites --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use moviedeck::api::Catalog;
use moviedeck::app::{App, Completion, Effect};
use moviedeck::cli::{Cli, Command, ExitCode, Output};
use moviedeck::commands::{self, Context};
use moviedeck::config::Config;
use moviedeck::{logging, ui};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        logging::init_cli_tracing();
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        logging::init_tui_tracing();
        run_tui(cli).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let ctx = Context::new(Config::resolve(cli.config.as_deref()));

    match cli.command {
        Some(Command::Popular(cmd)) => commands::popular_cmd(cmd, &ctx, &output).await,
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &ctx, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &ctx, &output).await,
        Some(Command::Favorites(cmd)) => commands::favorites_cmd(cmd, &ctx, &output).await,
        Some(Command::Toggle(cmd)) => commands::toggle_cmd(cmd, &ctx, &output).await,
        // Handled by the is_cli_mode check
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_tui(cli: Cli) -> Result<()> {
    let ctx = Context::new(Config::resolve(cli.config.as_deref()));
    // Fail before touching the terminal
    let catalog: Arc<dyn Catalog> = Arc::new(ctx.catalog().map_err(anyhow::Error::msg)?);

    let mut app = App::new(ctx.shared_favorites()).with_image_base_url(ctx.config.image_base_url());
    tracing::info!("Starting TUI");

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, catalog).await;
    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;
    result
}

/// Run an effect on the runtime and post its completion back to the loop
fn spawn_effect(effect: Effect, catalog: Arc<dyn Catalog>, tx: mpsc::UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let completion = effect.run(catalog.as_ref()).await;
        // Receiver gone means the app is shutting down
        let _ = tx.send(completion);
    });
}

/// Main event loop - handles input, applies completions, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, catalog: Arc<dyn Catalog>) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_effect(app.start(), catalog.clone(), tx.clone());

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(effect) = app.handle_key(key) {
                        spawn_effect(effect, catalog.clone(), tx.clone());
                    }
                }
            }
        }

        while let Ok(completion) = rx.try_recv() {
            app.apply(completion);
        }
    }

    Ok(())
}
