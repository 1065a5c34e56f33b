//! Custom error types for the cash flow tool
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for cash flow operations
#[derive(Error, Debug)]
pub enum CashflowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Mail composition or delivery errors
    #[error("Mail error: {0}")]
    Mail(String),

    /// Login and credential errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CashflowError {
    /// Create a "not found" error for statements
    pub fn statement_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Statement",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for form fields
    pub fn field_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Field",
            identifier: identifier.into(),
        }
    }

    /// Create a "duplicate" error for statements
    pub fn statement_exists(identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: "Statement",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for CashflowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CashflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for CashflowError {
    fn from(err: csv::Error) -> Self {
        Self::Export(format!("CSV: {}", err))
    }
}

impl From<zip::result::ZipError> for CashflowError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Export(format!("DOCX package: {}", err))
    }
}

/// Result type alias for cash flow operations
pub type CashflowResult<T> = Result<T, CashflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CashflowError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = CashflowError::statement_not_found("2025-01");
        assert_eq!(err.to_string(), "Statement not found: 2025-01");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_duplicate_error() {
        let err = CashflowError::statement_exists("2025-02");
        assert_eq!(err.to_string(), "Statement already exists: 2025-02");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CashflowError = io_err.into();
        assert!(matches!(err, CashflowError::Io(_)));
    }
}
