//! Logging setup
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to a file
//! in the base directory instead. The filter is read from `CASHFLOW_LOG`
//! using `tracing_subscriber::EnvFilter` syntax.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{CashflowError, CashflowResult};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CASHFLOW_LOG";

/// Where log output goes
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(target: LogTarget) -> CashflowResult<()> {
    let result = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter("warn"))
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    CashflowError::Io(format!("Failed to open log file {}: {}", path.display(), e))
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter("info"))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    if let Err(e) = result {
        // A subscriber is already installed (tests, repeated init)
        tracing::debug!("logging already initialized: {}", e);
    }

    Ok(())
}
