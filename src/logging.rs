//! Tracing initialisation
//!
//! The TUI owns the terminal, so it only logs when `MOVIEDECK_LOG` names a
//! file. CLI commands log to stderr, `warn` and above unless `RUST_LOG` says
//! otherwise.

use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file path for TUI mode
pub const LOG_ENV: &str = "MOVIEDECK_LOG";

/// File logging for TUI mode; does nothing unless `MOVIEDECK_LOG` is set
pub fn init_tui_tracing() {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return;
    };

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", path, e);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}

/// Stderr logging for CLI mode
pub fn init_cli_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
