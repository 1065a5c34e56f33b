//! hoa-cashflow - monthly cash flow statements for homeowners' associations
//!
//! A statement records one month of an association's money: the beginning
//! balance (cash in bank and on hand), receipts, disbursements and the ending
//! balance. Totals are always derived from the entered amounts.
//!
//! # Architecture
//!
//! - `config`: paths, settings and logging
//! - `error`: custom error types
//! - `models`: money, periods, the field catalogue and the statement itself
//! - `storage`: one JSON file per period
//! - `services`: statement lifecycle (open, carry forward, edit, import)
//! - `report`: the printable layout shared by every output format
//! - `export`: CSV, PDF, DOCX, JSON and YAML writers
//! - `mail`: SMTP delivery of exported statements
//! - `auth`: Argon2 password login for the TUI
//! - `cli`, `display`, `tui`: user interfaces
//!
//! # Example
//!
//! ```rust,ignore
//! use cashflow::config::{CashflowPaths, Settings};
//! use cashflow::services::StatementService;
//! use cashflow::storage::Storage;
//!
//! let paths = CashflowPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! let statement = StatementService::new(&storage, &settings).open("2025-03".parse()?)?;
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod mail;
pub mod models;
pub mod report;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{CashflowError, CashflowResult};
