//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod auth;
pub mod config;
pub mod export;
pub mod import;
pub mod mail;
pub mod statement;

pub use auth::{handle_auth_command, AuthCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use export::{handle_export_command, ExportArgs};
pub use import::{handle_import_command, ImportArgs};
pub use mail::{handle_mail_command, MailArgs};
pub use statement::{handle_statement_command, StatementCommands};
