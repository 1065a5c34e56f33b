//! Mail composition
//!
//! Builds a multipart message carrying the exported statement files.

use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use crate::config::Settings;
use crate::error::{CashflowError, CashflowResult};
use crate::export::ExportFormat;
use crate::models::ReportPeriod;

/// A message to send
#[derive(Debug, Clone, Default)]
pub struct MailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

impl MailRequest {
    /// A statement mail using the configured subject template
    ///
    /// Falls back to the configured default recipients when `recipients` is
    /// empty.
    pub fn for_statement(
        settings: &Settings,
        period: &ReportPeriod,
        recipients: Vec<String>,
        attachments: Vec<PathBuf>,
    ) -> Self {
        let recipients = if recipients.is_empty() {
            settings.mail.default_recipients.clone()
        } else {
            recipients
        };

        let association = settings.association.name.as_str();
        let body = format!(
            "Good day,\n\nAttached is the {} cash flow statement for {}.\n\n{}",
            association,
            period.label(),
            sign_off(settings)
        );

        Self {
            recipients,
            subject: render_subject(&settings.mail.subject_template, association, period),
            body,
            attachments,
        }
    }
}

fn sign_off(settings: &Settings) -> String {
    let name = settings.signatories.prepared_by.trim();
    if name.is_empty() {
        format!("{} Treasurer", settings.association.name)
    } else {
        name.to_string()
    }
}

/// Fill `{association}` and `{period}` in a subject template
pub fn render_subject(template: &str, association: &str, period: &ReportPeriod) -> String {
    template
        .replace("{association}", association)
        .replace("{period}", &period.label())
        .trim()
        .to_string()
}

/// The sender mailbox, using the SMTP login when no from address is set
pub fn sender(settings: &Settings) -> CashflowResult<Mailbox> {
    let address = if settings.mail.from_address.trim().is_empty() {
        settings.mail.username.trim()
    } else {
        settings.mail.from_address.trim()
    };
    if address.is_empty() {
        return Err(CashflowError::Mail(
            "No sender configured; set mail.from_address or mail.username".into(),
        ));
    }

    let address = address
        .parse()
        .map_err(|e| CashflowError::Mail(format!("Invalid sender address '{}': {}", address, e)))?;

    let name = if settings.mail.from_name.trim().is_empty() {
        settings.association.name.clone()
    } else {
        settings.mail.from_name.trim().to_string()
    };

    Ok(Mailbox::new(Some(name), address))
}

fn parse_recipient(recipient: &str) -> CashflowResult<Mailbox> {
    recipient
        .trim()
        .parse()
        .map_err(|e| CashflowError::Mail(format!("Invalid recipient '{}': {}", recipient, e)))
}

/// Check a request before anything is sent
pub fn validate_request(settings: &Settings, request: &MailRequest) -> CashflowResult<()> {
    if request.recipients.is_empty() {
        return Err(CashflowError::Mail(
            "No recipients; pass --to or set mail.default_recipients".into(),
        ));
    }
    for recipient in &request.recipients {
        parse_recipient(recipient)?;
    }
    sender(settings)?;

    for path in &request.attachments {
        if !path.is_file() {
            return Err(CashflowError::Mail(format!(
                "Attachment not found: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

fn attachment_type(path: &Path) -> CashflowResult<ContentType> {
    let mime = ExportFormat::from_path(path)
        .map(|format| format.content_type())
        .unwrap_or("application/octet-stream");
    ContentType::parse(mime)
        .map_err(|e| CashflowError::Mail(format!("Invalid content type {}: {}", mime, e)))
}

/// Build the message for a request
pub fn build_message(settings: &Settings, request: &MailRequest) -> CashflowResult<Message> {
    validate_request(settings, request)?;

    let mut builder = Message::builder()
        .from(sender(settings)?)
        .subject(request.subject.as_str());
    for recipient in &request.recipients {
        builder = builder.to(parse_recipient(recipient)?);
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(request.body.clone()));
    for path in &request.attachments {
        let bytes = std::fs::read(path).map_err(|e| {
            CashflowError::Mail(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        parts = parts.singlepart(Attachment::new(name).body(bytes, attachment_type(path)?));
    }

    builder
        .multipart(parts)
        .map_err(|e| CashflowError::Mail(format!("Failed to build message: {}", e)))
}
