//! Core data models
//!
//! - `money`: fixed-point currency amounts
//! - `period`: monthly reporting periods
//! - `field`: the fixed catalog of form fields
//! - `statement`: the cash flow statement and its totals

pub mod field;
pub mod money;
pub mod period;
pub mod statement;

pub use field::{FieldId, Section};
pub use money::{Money, MoneyParseError};
pub use period::{PeriodParseError, ReportPeriod};
pub use statement::{CashFlowStatement, StatementTotals};
