use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cashflow::cli::{
    handle_auth_command, handle_config_command, handle_export_command, handle_import_command,
    handle_mail_command, handle_statement_command, AuthCommands, ConfigCommands, ExportArgs,
    ImportArgs, MailArgs, StatementCommands,
};
use cashflow::config::logging::{init_logging, LogTarget};
use cashflow::config::{CashflowPaths, Settings};
use cashflow::models::ReportPeriod;
use cashflow::storage::Storage;

#[derive(Parser)]
#[command(
    name = "cashflow",
    version,
    about = "Monthly cash flow statements for homeowners' associations",
    long_about = "Prepare the monthly cash flow statement of a homeowners' association: \
                  beginning balance, receipts, disbursements and ending balance. \
                  Statements can be edited in a terminal form, exported to CSV, PDF, \
                  Word, JSON and YAML, and mailed to the board."
)]
struct Cli {
    /// Directory holding settings, statements and exports
    #[arg(long, global = true, env = "CASHFLOW_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the statement form in the interactive TUI
    #[command(alias = "ui")]
    Tui {
        /// Month to open (YYYY-MM); defaults to the current month
        period: Option<ReportPeriod>,
    },

    /// Statement management commands
    #[command(subcommand, alias = "st")]
    Statement(StatementCommands),

    /// Export a statement to CSV, PDF, DOCX, JSON or YAML
    Export(ExportArgs),

    /// Import a statement from an exported CSV, JSON or YAML file
    Import(ImportArgs),

    /// Mail an exported statement over SMTP
    Mail(MailArgs),

    /// Login credentials for the TUI
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Create the data directory and default settings
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => CashflowPaths::with_base_dir(dir),
        None => CashflowPaths::new()?,
    };

    // The TUI owns the terminal, so its log goes to a file
    let log_target = match cli.command {
        Some(Commands::Tui { .. }) => LogTarget::File(paths.log_file()),
        _ => LogTarget::Stderr,
    };
    init_logging(log_target)?;

    let mut settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Tui { period }) => {
            let period = period.unwrap_or_else(ReportPeriod::current);
            cashflow::tui::run_tui(&storage, &settings, &paths, period)?;
        }
        Some(Commands::Statement(cmd)) => {
            handle_statement_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&storage, &settings, args)?;
        }
        Some(Commands::Import(args)) => {
            handle_import_command(&storage, &settings, args)?;
        }
        Some(Commands::Mail(args)) => {
            handle_mail_command(&storage, &settings, args)?;
        }
        Some(Commands::Auth(cmd)) => {
            handle_auth_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Config(cmd)) => {
            handle_config_command(&paths, &mut settings, cmd)?;
        }
        Some(Commands::Init) => {
            let existed = paths.is_initialized();
            if !existed {
                settings.save(&paths)?;
            }
            println!("Data directory: {}", paths.base_dir().display());
            println!("Statements:     {}", paths.statements_dir().display());
            println!("Exports:        {}", settings.export_dir(&paths).display());
            println!();
            if existed {
                println!("Already initialized; settings were left unchanged.");
            } else {
                println!("Initialization complete!");
                println!("Set the association name with:");
                println!("  cashflow config set association.name \"Your Association\"");
            }
        }
        None => {
            println!("cashflow - monthly cash flow statements for homeowners' associations");
            println!();
            println!("Run 'cashflow --help' for usage information.");
            println!("Run 'cashflow tui' to open this month's statement.");
        }
    }

    Ok(())
}
