//! Configuration CLI commands

use clap::Subcommand;

use crate::config::{CashflowPaths, Settings};
use crate::error::CashflowResult;

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show paths and current settings
    Show,

    /// Change a setting, e.g. `config set association.name "Pine Hills HOA"`
    Set {
        /// Dotted setting key (see `config keys`)
        key: String,
        value: String,
    },

    /// List the keys accepted by `config set`
    Keys,
}

/// Handle config commands
pub fn handle_config_command(
    paths: &CashflowPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> CashflowResult<()> {
    match cmd {
        ConfigCommands::Show => show_config(paths, settings),
        ConfigCommands::Set { key, value } => {
            settings.set_value(&key, &value)?;
            settings.save(paths)?;
            println!("{} = {}", key, value);
        }
        ConfigCommands::Keys => {
            for key in Settings::KEYS {
                println!("{}", key);
            }
        }
    }
    Ok(())
}

fn show_config(paths: &CashflowPaths, settings: &Settings) {
    let or_unset = |s: &str| {
        if s.trim().is_empty() {
            "(not set)".to_string()
        } else {
            s.to_string()
        }
    };

    println!("Cash Flow Configuration");
    println!("=======================");
    println!("Base directory:    {}", paths.base_dir().display());
    println!("Statements:        {}", paths.statements_dir().display());
    println!("Exports:           {}", settings.export_dir(paths).display());
    println!("Log file:          {}", paths.log_file().display());
    println!();
    println!("Association");
    println!("  Name:            {}", settings.association.name);
    println!("  Address:         {}", or_unset(&settings.association.address));
    println!("Signatories");
    println!("  Prepared by:     {}", or_unset(&settings.signatories.prepared_by));
    println!("  Checked by:      {}", or_unset(&settings.signatories.checked_by));
    println!("  Approved by:     {}", or_unset(&settings.signatories.approved_by));
    println!("Report");
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
    println!("  Carry forward:   {}", settings.carry_forward);
    println!("Mail");
    println!(
        "  SMTP server:     {}:{} ({})",
        settings.mail.smtp_host, settings.mail.smtp_port, settings.mail.security
    );
    println!("  Username:        {}", or_unset(&settings.mail.username));
    println!("  From:            {}", or_unset(&settings.mail.from_address));
    println!(
        "  Recipients:      {}",
        or_unset(&settings.mail.default_recipients.join(", "))
    );
    println!("  Subject:         {}", settings.mail.subject_template);
    println!(
        "Login:             {}",
        if settings.auth.is_configured() {
            "required"
        } else {
            "not required"
        }
    );
}
