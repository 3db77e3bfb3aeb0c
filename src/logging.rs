//! File logging for tokbar-settings.
//!
//! Events go to `tokbar-settings.log.YYYY-MM-DD` in the user's state directory,
//! never to the terminal, which belongs to the settings screen. One file per
//! day; the seven newest are kept.
//!
//! Log lines carry outcomes and tiers only. Passwords, tokens and usernames are
//! never formatted into a message.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

/// Prefix of the daily log files (`tokbar-settings.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "tokbar-settings.log";

const KEPT_LOG_FILES: usize = 7;

/// Flushes the background writer when the process exits.
static WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber writing to the daily log file.
///
/// `RUST_LOG` selects the filter; without it everything at `info` and above is kept.
///
/// # Errors
/// - If the log directory cannot be resolved or created
/// - If called twice
pub fn init_logging() -> Result<(), anyhow::Error> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)?;

    if let Err(e) = cleanup_old_logs(&dir) {
        eprintln!("Warning: could not prune old logs in {}: {e}", dir.display());
    }

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE_PREFIX));
    WRITER_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .init();

    tracing::debug!("Logging to {}", dir.display());
    Ok(())
}

/// `$XDG_STATE_HOME/tokbar`, or `~/.local/state/tokbar` when unset.
///
/// # Errors
/// - If `XDG_STATE_HOME` is unset and the home directory is unknown
pub fn log_dir() -> Result<PathBuf, anyhow::Error> {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        return Ok(PathBuf::from(state).join("tokbar"));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".local").join("state").join("tokbar"))
}

/// Whether a file name is one of our rotated logs.
pub fn is_log_file(file_name: &str) -> bool {
    file_name
        .strip_prefix(LOG_FILE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date.matches('-').count() == 2)
}

/// Deletes all but the newest rotated logs. Other files in the directory are left alone.
///
/// The date suffix orders names chronologically.
fn cleanup_old_logs(dir: &Path) -> Result<(), anyhow::Error> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_log_file(name))
        .collect();
    names.sort_unstable_by(|a, b| b.cmp(a));

    for name in names.iter().skip(KEPT_LOG_FILES) {
        let path = dir.join(name);
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!("Failed to delete old log file {}: {}", path.display(), e);
        }
    }
    Ok(())
}
