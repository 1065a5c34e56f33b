//! Service layer
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, carry-forward, and computed totals.

pub mod statement;

pub use statement::{parse_assignment, StatementService, StatementSummary};
