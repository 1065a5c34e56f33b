//! CLI command for statement export

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::error::CashflowResult;
use crate::export::{export_to_dir, ExportFormat};
use crate::models::ReportPeriod;
use crate::services::StatementService;
use crate::storage::Storage;

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Statement month (YYYY-MM)
    pub period: ReportPeriod,

    /// Formats to write, comma separated (default: all)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub format: Vec<ExportFormat>,

    /// Output directory (default: the configured export directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    /// Requested formats, or every format when none were given
    pub fn formats(&self) -> Vec<ExportFormat> {
        if self.format.is_empty() {
            ExportFormat::ALL.to_vec()
        } else {
            self.format.clone()
        }
    }
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> CashflowResult<()> {
    let service = StatementService::new(storage, settings);
    let statement = service.get(args.period)?;

    for warning in statement.validate() {
        eprintln!("Warning: {}", warning);
    }

    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| settings.export_dir(storage.paths()));
    let written = export_to_dir(&statement, settings, &args.formats(), &dir)?;

    println!("Exported {} for {}:", plural(written.len()), args.period.label());
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn plural(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", count)
    }
}
