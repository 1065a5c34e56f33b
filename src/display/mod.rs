//! Display formatting for terminal output
//!
//! Renders statements, statement lists and the field catalogue as tables.

pub mod statement;

pub use statement::{format_field_list, format_money, format_statement, format_statement_list};
