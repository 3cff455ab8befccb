use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "solace.log";

fn filter(verbose: bool, quiet: &str) -> EnvFilter {
    let default = if verbose { "solace=debug,info" } else { quiet };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Open `<dir>/solace.log` for appending behind a non-blocking writer
fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir).context("Failed to create log directory")?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .context("Failed to open log file")?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Log to `<dir>/solace.log`. The terminal belongs to the UI while it runs.
///
/// Keep the returned guard alive until exit so buffered lines get flushed.
pub fn init_file(dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    let (writer, guard) = file_writer(dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose, "info"))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}

/// File logging for the interactive chat, or none at all if the log file
/// cannot be opened. The chat runs either way.
pub fn init_tui(dir: &Path, verbose: bool) -> Option<WorkerGuard> {
    match init_file(dir, verbose) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    }
}

/// Log to stderr, for the non-interactive commands
pub fn init_stderr(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose, "warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        let (_writer, _guard) = file_writer(&logs).unwrap();
        assert!(logs.join(LOG_FILE).exists());
    }

    #[test]
    fn unusable_log_directory_disables_logging() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the directory should be
        let blocked = dir.path().join("logs");
        std::fs::write(&blocked, "").unwrap();

        assert!(file_writer(&blocked).is_err());
        assert!(init_tui(&blocked, false).is_none());
    }
}
