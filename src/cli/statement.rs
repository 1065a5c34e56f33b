//! CLI commands for statement management
//!
//! Creating, editing, showing and listing monthly statements.

use std::io::Write;

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_field_list, format_statement, format_statement_list};
use crate::error::{CashflowError, CashflowResult};
use crate::models::ReportPeriod;
use crate::report::StatementReport;
use crate::services::{parse_assignment, StatementService};
use crate::storage::Storage;

/// Statement subcommands
#[derive(Subcommand, Debug)]
pub enum StatementCommands {
    /// Create a statement for a month (YYYY-MM)
    New {
        period: ReportPeriod,
    },

    /// Show a statement as a table
    Show {
        period: ReportPeriod,
    },

    /// Set one or more amounts, e.g. `monthly_dues=12500 security=6,000.00`
    Set {
        period: ReportPeriod,

        /// `field=amount` pairs; see `statement fields` for keys
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Reset every amount to zero
    Clear {
        period: ReportPeriod,
    },

    /// Replace the notes printed under the table
    Notes {
        period: ReportPeriod,

        /// Note text; an empty string removes the notes
        text: String,
    },

    /// Change the preparation date (YYYY-MM-DD or "today")
    Date {
        period: ReportPeriod,
        date: String,
    },

    /// List saved statements with totals
    #[command(alias = "ls")]
    List,

    /// Delete a saved statement
    #[command(alias = "rm")]
    Delete {
        period: ReportPeriod,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List the field keys accepted by `statement set`
    Fields,
}

/// Handle statement commands
pub fn handle_statement_command(
    storage: &Storage,
    settings: &Settings,
    cmd: StatementCommands,
) -> CashflowResult<()> {
    let service = StatementService::new(storage, settings);

    match cmd {
        StatementCommands::New { period } => {
            let statement = service.create(period)?;
            println!("Created statement for {}", period.label());
            if !statement.is_empty() {
                let totals = statement.totals();
                println!(
                    "Beginning balance carried forward: {}",
                    totals.beginning_total.format_with_symbol(&settings.currency_symbol)
                );
            }
        }

        StatementCommands::Show { period } => {
            let statement = service.get(period)?;
            let report = StatementReport::build(&statement, settings);
            print!("{}", format_statement(&report));
            for warning in statement.validate() {
                println!("Warning: {}", warning);
            }
        }

        StatementCommands::Set { period, values } => {
            let assignments = values
                .iter()
                .map(|v| parse_assignment(v))
                .collect::<CashflowResult<Vec<_>>>()?;

            let statement = service.set_fields(period, &assignments)?;
            for (field, amount) in &assignments {
                println!(
                    "{:<28} {}",
                    field.label(),
                    amount.format_with_symbol(&settings.currency_symbol)
                );
            }

            let totals = statement.totals();
            println!();
            println!(
                "Ending balance for {}: {}",
                period,
                totals.ending_total.format_with_symbol(&settings.currency_symbol)
            );
        }

        StatementCommands::Clear { period } => {
            service.clear(period)?;
            println!("Cleared all amounts for {}", period.label());
        }

        StatementCommands::Notes { period, text } => {
            let statement = service.set_notes(period, &text)?;
            if statement.notes.is_empty() {
                println!("Removed notes for {}", period.label());
            } else {
                println!("Updated notes for {}", period.label());
            }
        }

        StatementCommands::Date { period, date } => {
            let date = parse_date(&date)?;
            service.set_prepared_on(period, date)?;
            println!("Preparation date for {} set to {}", period.label(), date);
        }

        StatementCommands::List => {
            println!("{}", format_statement_list(&service.list()?));
        }

        StatementCommands::Delete { period, yes } => {
            if !storage.statements.exists(&period) {
                return Err(CashflowError::statement_not_found(period.to_string()));
            }
            if !yes && !confirm(&format!("Delete the statement for {}?", period.label()))? {
                println!("Aborted.");
                return Ok(());
            }
            service.delete(period)?;
            println!("Deleted statement for {}", period.label());
        }

        StatementCommands::Fields => {
            println!("{}", format_field_list());
        }
    }

    Ok(())
}

/// Parse a date argument, accepting "today"
pub fn parse_date(input: &str) -> CashflowResult<NaiveDate> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CashflowError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", input))
    })
}

/// Ask a yes/no question on stdin
pub(crate) fn confirm(question: &str) -> CashflowResult<bool> {
    print!("{} (yes/no): ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
