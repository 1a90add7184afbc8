//! Shared tracing initialization.
//!
//! The bot and every CLI invocation append structured logs to the same
//! `bot.log`, so ingestion failures and provider fallbacks stay visible to the
//! operator after the process exits.

use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing to `log_path` (append mode).
///
/// Falls back to stderr when the log file cannot be opened.
pub fn init_tracing(log_path: &Path) {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    // Short writes (< PIPE_BUF) are atomic, so concurrent processes can share the file.
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(log_file) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(log_file))
                .with_target(true)
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            init_stderr_tracing();
            tracing::warn!(path = %log_path.display(), error = %e, "Log file unavailable, logging to stderr");
        }
    }
}

/// Initialize tracing to stderr only.
pub fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
