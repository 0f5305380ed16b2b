//! File logging for the terminal host.
//!
//! The overlay owns the terminal, so log output goes to a file instead of stderr.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

/// Installs the global subscriber. Returns the path being written to.
pub fn init_file_logging(config: &LogConfig) -> AppResult<PathBuf> {
    let log_path = config.file.clone().unwrap_or_else(default_log_path);

    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to create log directory: {}", parent.display()),
            )
        })?;
    }

    // Truncated on each run.
    let log_file = File::create(&log_path).map_err(|source| {
        AppError::io_with_context(
            source,
            format!("failed to create log file: {}", log_path.display()),
        )
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.filter))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| AppError::invalid_argument(format!("failed to install logger: {err}")))?;
    Ok(log_path)
}

/// `RUST_LOG` wins over the configured directive; a broken directive falls back to `info`.
fn env_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn default_log_path() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME")
        && !state.is_empty()
    {
        return log_file_under(Path::new(&state));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return log_file_under(&PathBuf::from(home).join(".local").join("state"));
    }
    std::env::temp_dir().join("palnav.log")
}

fn log_file_under(state_dir: &Path) -> PathBuf {
    state_dir.join("palnav").join("palnav.log")
}
