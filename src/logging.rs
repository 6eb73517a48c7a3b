//! File logging for wikitype.
//!
//! The terminal belongs to the UI while the app runs, so events go to a log
//! file instead of stderr. `RUST_LOG` overrides the configured level, e.g.
//! `RUST_LOG=wikitype=debug`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("logging already initialized")]
    AlreadyInitialized,

    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    #[error("failed to open log file: {0}")]
    FileCreate(#[from] io::Error),

    #[error("failed to set global subscriber: {0}")]
    SetSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    if LOGGING_INITIALIZED.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|_| LogError::InvalidLevel(config.level.clone()))?,
    };

    ensure_parent_dir(&config.file)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(file)
            .with_target(true)
            .with_ansi(false),
    );
    tracing::subscriber::set_global_default(subscriber)?;

    let _ = LOGGING_INITIALIZED.set(());

    tracing::info!(
        log_level = %config.level,
        log_file = %config.file.display(),
        "Logging initialized"
    );

    Ok(())
}
