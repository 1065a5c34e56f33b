//! CSV export and import
//!
//! The CSV layout is positional so a spreadsheet-edited file can be read
//! back by row number:
//!
//! | row     | contents                                  |
//! |---------|-------------------------------------------|
//! | 0       | `Period, YYYY-MM,`                        |
//! | 1       | `Prepared On, YYYY-MM-DD,`                |
//! | 2       | `Notes, <text>,`                          |
//! | 3       | `Section, Item, Amount`                   |
//! | 4..28   | one row per field, in `FieldId::ALL` order |
//! | 28..    | computed totals (ignored on import)       |

use std::io::{Read, Write};

use chrono::NaiveDate;

use crate::error::{CashflowError, CashflowResult};
use crate::models::{CashFlowStatement, FieldId, Money, ReportPeriod};

const PERIOD_ROW: usize = 0;
const PREPARED_ROW: usize = 1;
const NOTES_ROW: usize = 2;
const HEADER_ROW: usize = 3;
/// Row index of the first field
pub const FIRST_FIELD_ROW: usize = 4;

const TOTALS_SECTION: &str = "TOTALS";

/// Export a statement to CSV
pub fn export_statement_csv<W: Write>(
    statement: &CashFlowStatement,
    writer: W,
) -> CashflowResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let period = statement.period.to_string();
    let prepared_on = statement.prepared_on.format("%Y-%m-%d").to_string();

    csv.write_record(["Period", period.as_str(), ""])?;
    csv.write_record(["Prepared On", prepared_on.as_str(), ""])?;
    csv.write_record(["Notes", statement.notes.as_str(), ""])?;
    csv.write_record(["Section", "Item", "Amount"])?;

    for (field, amount) in statement.entries() {
        let amount = amount.format_plain();
        csv.write_record([field.section().title(), field.label(), amount.as_str()])?;
    }

    let totals = statement.totals();
    let total_rows = [
        ("Total Beginning Balance", totals.beginning_total),
        ("Total Receipts", totals.total_receipts),
        ("Total Disbursements", totals.total_disbursements),
        ("Net Increase (Decrease) in Cash", totals.net_change),
        ("Ending Cash in Bank", totals.ending_bank),
        ("Ending Cash on Hand", totals.ending_on_hand),
        ("Total Ending Balance", totals.ending_total),
    ];
    for (label, amount) in total_rows {
        let amount = amount.format_plain();
        csv.write_record([TOTALS_SECTION, label, amount.as_str()])?;
    }

    csv.flush()
        .map_err(|e| CashflowError::Export(format!("Failed to flush CSV: {}", e)))?;
    Ok(())
}

/// Import a statement from a CSV produced by [`export_statement_csv`]
///
/// Rows are matched by position. A label that differs from the expected
/// field label is logged and accepted, so renamed rows still import.
pub fn import_statement_csv<R: Read>(reader: R) -> CashflowResult<CashFlowStatement> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record
            .map_err(|e| CashflowError::Import(format!("line {}: {}", index + 1, e)))?;
        rows.push(record);
    }

    let required = FIRST_FIELD_ROW + FieldId::ALL.len();
    if rows.len() < required {
        return Err(CashflowError::Import(format!(
            "expected at least {} rows, found {}",
            required,
            rows.len()
        )));
    }

    let cell = |row: usize, col: usize| rows[row].get(col).unwrap_or("").trim();

    let period = ReportPeriod::parse(cell(PERIOD_ROW, 1))
        .map_err(|e| CashflowError::Import(format!("line {}: {}", PERIOD_ROW + 1, e)))?;

    let mut statement = CashFlowStatement::new(period);

    let prepared = cell(PREPARED_ROW, 1);
    if !prepared.is_empty() {
        statement.prepared_on = NaiveDate::parse_from_str(prepared, "%Y-%m-%d").map_err(|e| {
            CashflowError::Import(format!(
                "line {}: invalid date '{}': {}",
                PREPARED_ROW + 1,
                prepared,
                e
            ))
        })?;
    }

    statement.notes = cell(NOTES_ROW, 1).to_string();

    if !cell(HEADER_ROW, 0).eq_ignore_ascii_case("section") {
        tracing::warn!(line = HEADER_ROW + 1, "column header row not found");
    }

    for (offset, field) in FieldId::ALL.iter().enumerate() {
        let row = FIRST_FIELD_ROW + offset;
        let line = row + 1;

        let label = cell(row, 1);
        if !label.eq_ignore_ascii_case(field.label()) {
            tracing::warn!(
                line,
                expected = field.label(),
                found = label,
                "label mismatch; importing by position"
            );
        }

        let raw = cell(row, 2);
        let amount = if raw.is_empty() {
            Money::zero()
        } else {
            Money::parse(raw)
                .map_err(|e| CashflowError::Import(format!("line {}: {}", line, e)))?
        };

        statement
            .set(*field, amount)
            .map_err(|e| CashflowError::Import(format!("line {}: {}", line, e)))?;
    }

    tracing::debug!(period = %statement.period, "statement imported from CSV");
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement() -> CashFlowStatement {
        let mut s = CashFlowStatement::new(ReportPeriod::new(2025, 1).unwrap());
        s.set(FieldId::BeginningBank, Money::from_cents(5_000_000)).unwrap();
        s.set(FieldId::MonthlyDues, Money::from_cents(1_234_550)).unwrap();
        s.set(FieldId::Security, Money::from_cents(600_000)).unwrap();
        s.set(FieldId::EndingOnHand, Money::from_cents(20_000)).unwrap();
        s.notes = "Dues collected, \"late\" fees waived".to_string();
        s
    }

    fn export(statement: &CashFlowStatement) -> String {
        let mut out = Vec::new();
        export_statement_csv(statement, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_export_layout() {
        let csv = export(&statement());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Period,2025-01,");
        assert_eq!(lines[1], "Prepared On,2025-01-31,");
        assert_eq!(lines[3], "Section,Item,Amount");
        assert_eq!(lines[4], "BEGINNING BALANCE,Cash in Bank,50000.00");
        assert_eq!(lines[6], "CASH RECEIPTS,Monthly Dues,12345.50");
        assert_eq!(lines.len(), FIRST_FIELD_ROW + FieldId::ALL.len() + 7);
        assert!(csv.contains("TOTALS,Total Ending Balance,56345.50"));
    }

    #[test]
    fn test_import_recovers_statement() {
        let original = statement();
        let imported = import_statement_csv(export(&original).as_bytes()).unwrap();

        assert_eq!(imported.period, original.period);
        assert_eq!(imported.prepared_on, original.prepared_on);
        assert_eq!(imported.notes, original.notes);
        assert_eq!(imported.totals(), original.totals());
    }

    #[test]
    fn test_import_ignores_edited_totals_and_labels() {
        let csv = export(&statement())
            .replace("TOTALS,Total Receipts,12345.50", "TOTALS,Total Receipts,1.00")
            .replace("Monthly Dues", "Association Dues");

        let imported = import_statement_csv(csv.as_bytes()).unwrap();
        assert_eq!(imported.totals().total_receipts.cents(), 1_234_550);
    }

    #[test]
    fn test_import_accepts_grouped_and_blank_amounts() {
        let csv = export(&statement())
            .replace("Monthly Dues,12345.50", "Monthly Dues,\"12,345.50\"")
            .replace("Security Services,6000.00", "Security Services,");

        let imported = import_statement_csv(csv.as_bytes()).unwrap();
        assert_eq!(imported.get(FieldId::MonthlyDues).cents(), 1_234_550);
        assert_eq!(imported.get(FieldId::Security), Money::zero());
    }

    #[test]
    fn test_import_reports_bad_line() {
        let csv = export(&statement()).replace("Monthly Dues,12345.50", "Monthly Dues,lots");

        let err = import_statement_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 7"), "{}", err);
    }

    #[test]
    fn test_import_rejects_truncated_file() {
        let csv: String = export(&statement())
            .lines()
            .take(10)
            .collect::<Vec<_>>()
            .join("\n");

        let err = import_statement_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CashflowError::Import(_)));
    }

    #[test]
    fn test_import_rejects_negative_amount() {
        let csv = export(&statement()).replace("Security Services,6000.00", "Security Services,-5");
        assert!(import_statement_csv(csv.as_bytes()).is_err());
    }
}
