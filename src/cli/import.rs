//! CLI command for importing a statement file
//!
//! Accepts the CSV layout written by `export`, or a JSON/YAML archive.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Settings;
use crate::error::{CashflowError, CashflowResult};
use crate::export::{import_statement_csv, import_statement_json, import_statement_yaml, ExportFormat};
use crate::models::{CashFlowStatement, ReportPeriod};
use crate::services::StatementService;
use crate::storage::Storage;

/// Arguments for `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Statement month the file belongs to (YYYY-MM)
    pub period: ReportPeriod,

    /// File to import (.csv, .json or .yaml)
    pub file: PathBuf,

    /// Replace an existing statement for the month
    #[arg(short, long)]
    pub force: bool,
}

/// Read a statement file, choosing the parser from the extension
pub fn read_statement_file(path: &Path) -> CashflowResult<CashFlowStatement> {
    let open_error =
        |e: std::io::Error| CashflowError::Import(format!("Cannot read {}: {}", path.display(), e));

    match ExportFormat::from_path(path) {
        Some(ExportFormat::Csv) => {
            let file = File::open(path).map_err(open_error)?;
            import_statement_csv(BufReader::new(file))
        }
        Some(ExportFormat::Json) => {
            let contents = std::fs::read_to_string(path).map_err(open_error)?;
            import_statement_json(&contents)
        }
        Some(ExportFormat::Yaml) => {
            let contents = std::fs::read_to_string(path).map_err(open_error)?;
            import_statement_yaml(&contents)
        }
        _ => Err(CashflowError::Import(format!(
            "Unsupported file type: {} (expected .csv, .json or .yaml)",
            path.display()
        ))),
    }
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> CashflowResult<()> {
    let statement = read_statement_file(&args.file)?;

    if statement.period != args.period {
        return Err(CashflowError::Import(format!(
            "{} holds the statement for {}, not {}",
            args.file.display(),
            statement.period,
            args.period
        )));
    }

    let service = StatementService::new(storage, settings);
    service.import(statement.clone(), args.force).map_err(|e| match e {
        CashflowError::Duplicate { .. } => CashflowError::Import(format!(
            "A statement for {} already exists; use --force to replace it",
            args.period
        )),
        other => other,
    })?;

    let totals = statement.totals();
    println!("Imported statement for {}", args.period.label());
    println!(
        "  Receipts:      {}",
        totals.total_receipts.format_with_symbol(&settings.currency_symbol)
    );
    println!(
        "  Disbursements: {}",
        totals.total_disbursements.format_with_symbol(&settings.currency_symbol)
    );
    println!(
        "  Ending:        {}",
        totals.ending_total.format_with_symbol(&settings.currency_symbol)
    );
    Ok(())
}
