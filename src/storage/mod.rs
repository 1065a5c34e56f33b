//! Storage layer
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod file_io;
pub mod statements;

pub use file_io::{read_json, write_atomic, write_json_atomic};
pub use statements::StatementRepository;

use crate::config::paths::CashflowPaths;
use crate::error::CashflowError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: CashflowPaths,
    pub statements: StatementRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: CashflowPaths) -> Result<Self, CashflowError> {
        paths.ensure_directories()?;

        Ok(Self {
            statements: StatementRepository::new(paths.statements_dir()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &CashflowPaths {
        &self.paths
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
