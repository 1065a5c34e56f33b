//! Report layout shared by every output format
//!
//! [`StatementReport`] flattens a statement into the ordered table of lines
//! that the terminal view, PDF, DOCX and CSV renderers all print.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;
use crate::models::{CashFlowStatement, FieldId, Money, ReportPeriod, Section, StatementTotals};

pub const REPORT_TITLE: &str = "CASH FLOW STATEMENT";

/// Kind of row in the report table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Heading,
    Item,
    Subtotal,
    Total,
    Spacer,
}

/// One row of the report table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub kind: LineKind,
    pub indent: u8,
    pub label: String,
    pub amount: Option<Money>,
}

impl ReportLine {
    fn heading(label: &str) -> Self {
        Self {
            kind: LineKind::Heading,
            indent: 0,
            label: label.to_string(),
            amount: None,
        }
    }

    fn item(label: &str, amount: Money) -> Self {
        Self {
            kind: LineKind::Item,
            indent: 1,
            label: label.to_string(),
            amount: Some(amount),
        }
    }

    fn subtotal(label: &str, amount: Money) -> Self {
        Self {
            kind: LineKind::Subtotal,
            indent: 0,
            label: label.to_string(),
            amount: Some(amount),
        }
    }

    fn total(label: &str, amount: Money) -> Self {
        Self {
            kind: LineKind::Total,
            indent: 0,
            label: label.to_string(),
            amount: Some(amount),
        }
    }

    fn spacer() -> Self {
        Self {
            kind: LineKind::Spacer,
            indent: 0,
            label: String::new(),
            amount: None,
        }
    }

    /// Whether this row is printed in bold
    pub fn is_emphasized(&self) -> bool {
        matches!(
            self.kind,
            LineKind::Heading | LineKind::Subtotal | LineKind::Total
        )
    }
}

/// A signature block entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signatory {
    pub role: &'static str,
    pub name: String,
}

/// Rendered-ready view of a statement
#[derive(Debug, Clone, Serialize)]
pub struct StatementReport {
    pub title: String,
    pub association: String,
    pub address: String,
    pub period: ReportPeriod,
    pub period_label: String,
    pub prepared_on: String,
    pub currency_symbol: String,
    pub lines: Vec<ReportLine>,
    pub notes: String,
    pub signatories: Vec<Signatory>,
    pub totals: StatementTotals,
}

impl StatementReport {
    /// Lay out a statement using the association details from settings
    pub fn build(statement: &CashFlowStatement, settings: &Settings) -> Self {
        let totals = statement.totals();
        let mut lines = Vec::with_capacity(FieldId::ALL.len() + 16);

        lines.push(ReportLine::heading(Section::BeginningBalance.title()));
        for field in FieldId::in_section(Section::BeginningBalance) {
            lines.push(ReportLine::item(field.label(), statement.get(field)));
        }
        lines.push(ReportLine::subtotal(
            "Total Beginning Balance",
            totals.beginning_total,
        ));
        lines.push(ReportLine::spacer());

        lines.push(ReportLine::heading(Section::Receipts.title()));
        for field in FieldId::in_section(Section::Receipts) {
            lines.push(ReportLine::item(field.label(), statement.get(field)));
        }
        lines.push(ReportLine::subtotal("Total Receipts", totals.total_receipts));
        lines.push(ReportLine::spacer());

        lines.push(ReportLine::heading(Section::Disbursements.title()));
        for field in FieldId::in_section(Section::Disbursements) {
            lines.push(ReportLine::item(field.label(), statement.get(field)));
        }
        lines.push(ReportLine::subtotal(
            "Total Disbursements",
            totals.total_disbursements,
        ));
        lines.push(ReportLine::spacer());

        lines.push(ReportLine::total(
            "Net Increase (Decrease) in Cash",
            totals.net_change,
        ));
        lines.push(ReportLine::spacer());

        lines.push(ReportLine::heading(Section::EndingBalance.title()));
        lines.push(ReportLine::item("Cash in Bank", totals.ending_bank));
        lines.push(ReportLine::item(
            FieldId::EndingOnHand.label(),
            totals.ending_on_hand,
        ));
        lines.push(ReportLine::total("Total Ending Balance", totals.ending_total));

        let signatories = vec![
            Signatory {
                role: "Prepared by",
                name: settings.signatories.prepared_by.clone(),
            },
            Signatory {
                role: "Checked by",
                name: settings.signatories.checked_by.clone(),
            },
            Signatory {
                role: "Approved by",
                name: settings.signatories.approved_by.clone(),
            },
        ];

        Self {
            title: REPORT_TITLE.to_string(),
            association: settings.association.name.clone(),
            address: settings.association.address.clone(),
            period: statement.period,
            period_label: format!(
                "For the month ended {}",
                format_date(statement.period.end_date(), &settings.date_format)
            ),
            prepared_on: format_date(statement.prepared_on, &settings.date_format),
            currency_symbol: settings.currency_symbol.clone(),
            lines,
            notes: statement.notes.clone(),
            signatories,
            totals,
        }
    }

    /// Amount text as printed in documents
    pub fn format_amount(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("({})", amount.abs().format_grouped())
        } else {
            amount.format_grouped()
        }
    }

    /// Signatories with a name filled in
    pub fn named_signatories(&self) -> impl Iterator<Item = &Signatory> {
        self.signatories.iter().filter(|s| !s.name.trim().is_empty())
    }
}

/// Format a date with a strftime pattern, falling back to ISO on a bad pattern
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}
