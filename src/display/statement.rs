//! Statement display formatting
//!
//! Renders statements and statement lists as terminal tables.

use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{FieldId, Money};
use crate::report::{LineKind, StatementReport};
use crate::services::StatementSummary;

/// Format a statement report as a table with its header and signatories
pub fn format_statement(report: &StatementReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Particulars".to_string(), format!("Amount ({})", report.currency_symbol)]);

    for line in &report.lines {
        let label = match line.kind {
            LineKind::Spacer => String::new(),
            LineKind::Heading => line.label.clone(),
            _ => format!("{}{}", "  ".repeat(line.indent as usize), line.label),
        };
        let amount = line
            .amount
            .map(|a| report.format_amount(a))
            .unwrap_or_default();
        builder.push_record([label, amount]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .modify(Columns::single(1), Alignment::right())
        .modify(Rows::first(), Alignment::center());

    let mut output = String::new();
    output.push_str(&format!("{}\n", report.association));
    if !report.address.trim().is_empty() {
        output.push_str(&format!("{}\n", report.address));
    }
    output.push_str(&format!("{}\n{}\n\n", report.title, report.period_label));
    output.push_str(&table.to_string());
    output.push('\n');

    if !report.notes.trim().is_empty() {
        output.push_str(&format!("\nNotes: {}\n", report.notes));
    }

    output.push_str(&format!("\nPrepared on: {}\n", report.prepared_on));
    for signatory in report.named_signatories() {
        output.push_str(&format!("{}: {}\n", signatory.role, signatory.name));
    }

    output
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Beginning")]
    beginning: String,
    #[tabled(rename = "Receipts")]
    receipts: String,
    #[tabled(rename = "Disbursements")]
    disbursements: String,
    #[tabled(rename = "Ending")]
    ending: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Format saved statements as a table, oldest first
pub fn format_statement_list(summaries: &[StatementSummary]) -> String {
    if summaries.is_empty() {
        return "No statements found.".to_string();
    }

    let rows = summaries.iter().map(|s| SummaryRow {
        period: s.period.to_string(),
        beginning: s.totals.beginning_total.format_grouped(),
        receipts: s.totals.total_receipts.format_grouped(),
        disbursements: s.totals.total_disbursements.format_grouped(),
        ending: s.totals.ending_total.format_grouped(),
        updated: s.updated_at.format("%Y-%m-%d %H:%M").to_string(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .modify(Columns::new(1..5), Alignment::right());
    table.to_string()
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Item")]
    label: &'static str,
    #[tabled(rename = "Section")]
    section: &'static str,
}

/// Format the list of editable fields and their command-line keys
pub fn format_field_list() -> String {
    let rows = FieldId::ALL.iter().map(|field| FieldRow {
        key: field.key(),
        label: field.label(),
        section: field.section().title(),
    });

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    table.to_string()
}

/// Format a single amount with the configured currency symbol
pub fn format_money(amount: Money, symbol: &str) -> String {
    if amount.is_negative() {
        format!("({})", amount.abs().format_with_symbol(symbol))
    } else {
        amount.format_with_symbol(symbol)
    }
}
