//! Tracing setup.
//!
//! One-shot subcommands log to stderr. The TUI owns the terminal, so it only
//! logs when given a file to write to.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, EXIT_IO};

const DEFAULT_DIRECTIVE: &str = "premium_estimator=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Log to stderr, honoring `RUST_LOG`.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `path` (appending), honoring `RUST_LOG`.
pub fn init_file(path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to open log file '{}': {e}", path.display())))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
