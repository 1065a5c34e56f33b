//! Statement export
//!
//! Every format renders the same statement:
//! - CSV: positional rows that can be edited and imported back
//! - PDF and DOCX: the printable report with signature lines
//! - JSON and YAML: full archive copies with computed totals

pub mod csv;
pub mod docx;
pub mod json;
pub mod pdf;
pub mod yaml;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{CashflowError, CashflowResult};
use crate::models::{CashFlowStatement, ReportPeriod};
use crate::report::StatementReport;
use crate::storage::write_atomic;

pub use self::csv::{export_statement_csv, import_statement_csv};
pub use docx::export_statement_docx;
pub use json::{export_statement_json, import_statement_json, StatementExport, EXPORT_SCHEMA_VERSION};
pub use pdf::export_statement_pdf;
pub use yaml::{export_statement_yaml, import_statement_yaml};

/// Output format for a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
    Docx,
    Json,
    Yaml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Csv,
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Json,
        ExportFormat::Yaml,
    ];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }

    /// MIME type used for mail attachments
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Json => "application/json",
            ExportFormat::Yaml => "application/yaml",
        }
    }

    /// Format matching a file's extension
    pub fn from_path(path: &Path) -> Option<ExportFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yml" => Some(ExportFormat::Yaml),
            other => other.parse().ok(),
        }
    }

    /// Standard file name for a period, e.g. `cash-flow-2025-03.pdf`
    pub fn file_name(&self, period: &ReportPeriod) -> String {
        format!("cash-flow-{}.{}", period, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CashflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CashflowError::Validation(format!(
                    "Unknown export format '{}'. Expected one of: csv, pdf, docx, json, yaml",
                    s
                ))
            })
    }
}

/// Write one statement in one format to a file
pub fn export_to_file(
    statement: &CashFlowStatement,
    settings: &Settings,
    format: ExportFormat,
    path: &Path,
) -> CashflowResult<()> {
    let association = settings.association.name.as_str();

    write_atomic(path, |writer| match format {
        ExportFormat::Csv => export_statement_csv(statement, writer),
        ExportFormat::Pdf => export_statement_pdf(&StatementReport::build(statement, settings), writer),
        ExportFormat::Docx => {
            export_statement_docx(&StatementReport::build(statement, settings), writer)
        }
        ExportFormat::Json => export_statement_json(statement, association, writer, true),
        ExportFormat::Yaml => export_statement_yaml(statement, association, writer),
    })
}

/// Write a statement in each requested format to `dir`
///
/// Returns the written paths in the order the formats were given. Repeated
/// formats are written once.
pub fn export_to_dir(
    statement: &CashFlowStatement,
    settings: &Settings,
    formats: &[ExportFormat],
    dir: &Path,
) -> CashflowResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(formats.len());

    for format in formats {
        let path = dir.join(format.file_name(&statement.period));
        if written.contains(&path) {
            continue;
        }
        export_to_file(statement, settings, *format, &path)?;
        tracing::info!(period = %statement.period, format = %format, path = %path.display(), "statement exported");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldId, Money};
    use tempfile::TempDir;

    fn statement() -> CashFlowStatement {
        let mut s = CashFlowStatement::new(ReportPeriod::new(2025, 3).unwrap());
        s.set(FieldId::MonthlyDues, Money::from_cents(500_000)).unwrap();
        s.set(FieldId::Salaries, Money::from_cents(200_000)).unwrap();
        s
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("xls".parse::<ExportFormat>().is_err());
        assert_eq!(
            ExportFormat::from_path(Path::new("out/report.YML")),
            Some(ExportFormat::Yaml)
        );
        assert_eq!(ExportFormat::from_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_file_name() {
        let period = ReportPeriod::new(2025, 3).unwrap();
        assert_eq!(ExportFormat::Docx.file_name(&period), "cash-flow-2025-03.docx");
    }

    #[test]
    fn test_export_all_formats() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("exports");

        let paths = export_to_dir(&statement(), &Settings::default(), &ExportFormat::ALL, &out)
            .unwrap();

        assert_eq!(paths.len(), 5);
        for path in &paths {
            let size = std::fs::metadata(path).unwrap().len();
            assert!(size > 0, "{} is empty", path.display());
        }
        assert!(std::fs::read(&paths[1]).unwrap().starts_with(b"%PDF"));
        assert!(std::fs::read(&paths[2]).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_csv_export_reimports() {
        let temp_dir = TempDir::new().unwrap();
        let paths = export_to_dir(
            &statement(),
            &Settings::default(),
            &[ExportFormat::Csv, ExportFormat::Csv],
            temp_dir.path(),
        )
        .unwrap();
        assert_eq!(paths.len(), 1);

        let file = std::fs::File::open(&paths[0]).unwrap();
        let imported = import_statement_csv(file).unwrap();
        assert_eq!(imported.totals(), statement().totals());
    }
}
