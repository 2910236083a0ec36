//! Diagnostic logging to `<home>/logs/smashfit.log`.
//!
//! Terminal output belongs to the CLI's own messages, so traces only go to
//! the log file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::paths;

/// Env var holding an `EnvFilter` directive; overrides the config level.
pub const LOG_ENV: &str = "SMASHFIT_LOG";

pub const LOG_FILE_NAME: &str = "smashfit.log";

/// Builds the filter: `SMASHFIT_LOG` if set and valid, else `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to the default logs directory.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes pending lines.
pub fn init(default_level: &str) -> Result<WorkerGuard> {
    init_in(&paths::logs_dir(), default_level)
}

pub fn init_in(dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}
