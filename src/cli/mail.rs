//! CLI command for mailing a statement
//!
//! Exports the requested formats, then sends them as attachments.

use clap::Args;

use crate::auth::SecureString;
use crate::config::Settings;
use crate::error::{CashflowError, CashflowResult};
use crate::export::{export_to_dir, ExportFormat};
use crate::mail::{build_message, send_request, MailRequest, SmtpMailer, PASSWORD_ENV};
use crate::models::ReportPeriod;
use crate::services::StatementService;
use crate::storage::Storage;

/// Arguments for `mail`
#[derive(Args, Debug)]
pub struct MailArgs {
    /// Statement month (YYYY-MM)
    pub period: ReportPeriod,

    /// Recipient addresses (default: mail.default_recipients)
    #[arg(short, long, value_delimiter = ',')]
    pub to: Vec<String>,

    /// Formats to attach
    #[arg(short, long, value_enum, value_delimiter = ',', default_value = "pdf")]
    pub format: Vec<ExportFormat>,

    /// Environment variable holding the SMTP password
    #[arg(long, default_value = PASSWORD_ENV)]
    pub password_env: String,

    /// Build the message and show what would be sent, without sending
    #[arg(long)]
    pub dry_run: bool,
}

/// Handle the mail command
pub fn handle_mail_command(
    storage: &Storage,
    settings: &Settings,
    args: MailArgs,
) -> CashflowResult<()> {
    let service = StatementService::new(storage, settings);
    let statement = service.get(args.period)?;

    let dir = settings.export_dir(storage.paths());
    let attachments = export_to_dir(&statement, settings, &args.format, &dir)?;
    let request = MailRequest::for_statement(settings, &args.period, args.to, attachments);

    if args.dry_run {
        let message = build_message(settings, &request)?;
        println!("Subject: {}", request.subject);
        println!("To:      {}", request.recipients.join(", "));
        for path in &request.attachments {
            println!("Attach:  {}", path.display());
        }
        println!("Size:    {} bytes (not sent)", message.formatted().len());
        return Ok(());
    }

    let password = smtp_password(&args.password_env, &settings.mail.username)?;
    let mailer = SmtpMailer::new(&settings.mail, &password)?;
    send_request(&mailer, settings, &request)?;

    println!(
        "Sent {} to {}",
        request.subject,
        request.recipients.join(", ")
    );
    Ok(())
}

/// Read the SMTP password from the environment, or prompt for it
fn smtp_password(env_var: &str, username: &str) -> CashflowResult<SecureString> {
    if let Ok(password) = std::env::var(env_var) {
        if !password.is_empty() {
            return Ok(SecureString::new(password));
        }
    }

    rpassword::prompt_password(format!("SMTP password for {}: ", username))
        .map(SecureString::new)
        .map_err(|e| CashflowError::Mail(format!("Failed to read password: {}", e)))
}
