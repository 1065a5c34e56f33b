//! Configuration module
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Logging setup

pub mod logging;
pub mod paths;
pub mod settings;

pub use paths::CashflowPaths;
pub use settings::{MailSecurity, Settings};
