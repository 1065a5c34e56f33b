//! YAML Export functionality
//!
//! Exports a statement to YAML for a human-readable archive copy.

use std::io::Write;

use crate::error::{CashflowError, CashflowResult};
use crate::export::json::StatementExport;
use crate::models::CashFlowStatement;

/// Export a statement to YAML format
pub fn export_statement_yaml<W: Write>(
    statement: &CashFlowStatement,
    association: &str,
    writer: &mut W,
) -> CashflowResult<()> {
    let export = StatementExport::new(statement, association);

    writeln!(
        writer,
        "# {} cash flow statement for {}",
        association, statement.period
    )
    .map_err(|e| CashflowError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| CashflowError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| CashflowError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| CashflowError::Export(e.to_string()))?;

    Ok(())
}

/// Read a statement back from a YAML export
pub fn import_statement_yaml(yaml_str: &str) -> CashflowResult<CashFlowStatement> {
    let export: StatementExport =
        serde_yaml::from_str(yaml_str).map_err(|e| CashflowError::Import(e.to_string()))?;
    export.validate().map_err(CashflowError::Import)?;
    Ok(export.statement)
}
