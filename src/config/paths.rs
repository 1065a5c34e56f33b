//! Path management for the cash flow tool
//!
//! Provides XDG-compliant path resolution for configuration, statements, and
//! exported documents.
//!
//! ## Path Resolution Order
//!
//! 1. `CASHFLOW_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/hoa-cashflow` or `~/.config/hoa-cashflow`
//! 3. Windows: `%APPDATA%\hoa-cashflow`

use std::path::PathBuf;

use crate::error::CashflowError;
use crate::models::ReportPeriod;

const APP_DIR_NAME: &str = "hoa-cashflow";

/// Manages all paths used by the application
#[derive(Debug, Clone)]
pub struct CashflowPaths {
    /// Base directory for all application data
    base_dir: PathBuf,
}

impl CashflowPaths {
    /// Create a new CashflowPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, CashflowError> {
        let base_dir = if let Ok(custom) = std::env::var("CASHFLOW_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create CashflowPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding one JSON file per statement period
    pub fn statements_dir(&self) -> PathBuf {
        self.data_dir().join("statements")
    }

    /// Default directory for exported documents
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("cashflow.log")
    }

    /// Path of the stored statement for a period
    pub fn statement_file(&self, period: &ReportPeriod) -> PathBuf {
        self.statements_dir().join(format!("{}.json", period))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), CashflowError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CashflowError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.statements_dir()).map_err(|e| {
            CashflowError::Io(format!("Failed to create statements directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if the application has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, CashflowError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_DIR_NAME));
    }

    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join(APP_DIR_NAME))
        .ok_or_else(|| CashflowError::Config("Could not determine home directory".into()))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, CashflowError> {
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Ok(PathBuf::from(appdata).join(APP_DIR_NAME));
    }

    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join(APP_DIR_NAME))
        .ok_or_else(|| CashflowError::Config("Could not determine APPDATA directory".into()))
}
