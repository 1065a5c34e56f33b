//! Mailing exported statements over SMTP
//!
//! Gmail and similar providers are reached with an app password over TLS.
//! The password is supplied at send time and never written to settings.

pub mod message;

pub use message::{build_message, render_subject, sender, validate_request, MailRequest};

use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::auth::SecureString;
use crate::config::settings::MailSettings;
use crate::config::{MailSecurity, Settings};
use crate::error::{CashflowError, CashflowResult};

/// Environment variable holding the SMTP password
pub const PASSWORD_ENV: &str = "CASHFLOW_SMTP_PASSWORD";

/// Delivers built messages
pub trait Mailer {
    fn send(&self, message: &Message) -> CashflowResult<()>;
}

/// Mailer backed by an SMTP relay
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Connect settings for the configured relay; nothing is sent until `send`
    pub fn new(settings: &MailSettings, password: &SecureString) -> CashflowResult<Self> {
        let host = settings.smtp_host.trim();
        if host.is_empty() {
            return Err(CashflowError::Mail("mail.smtp_host is not set".into()));
        }

        let builder = match settings.security {
            MailSecurity::Tls => SmtpTransport::relay(host),
            MailSecurity::StartTls => SmtpTransport::starttls_relay(host),
            MailSecurity::None => Ok(SmtpTransport::builder_dangerous(host)),
        }
        .map_err(|e| CashflowError::Mail(format!("Invalid SMTP relay {}: {}", host, e)))?;

        let mut builder = builder.port(settings.smtp_port);
        if !settings.username.trim().is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.trim().to_string(),
                password.as_str().to_string(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &Message) -> CashflowResult<()> {
        self.transport
            .send(message)
            .map(|_| ())
            .map_err(|e| CashflowError::Mail(format!("SMTP delivery failed: {}", e)))
    }
}

/// Build and deliver a request
pub fn send_request(
    mailer: &dyn Mailer,
    settings: &Settings,
    request: &MailRequest,
) -> CashflowResult<()> {
    let message = build_message(settings, request)?;
    mailer.send(&message)?;
    tracing::info!(
        recipients = request.recipients.len(),
        attachments = request.attachments.len(),
        subject = %request.subject,
        "statement mailed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportPeriod;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingMailer {
        sent: RefCell<Vec<Message>>,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, message: &Message) -> CashflowResult<()> {
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    struct FailingMailer;

    impl Mailer for FailingMailer {
        fn send(&self, _message: &Message) -> CashflowResult<()> {
            Err(CashflowError::Mail("connection refused".into()))
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.mail.from_address = "treasurer@cedar.example".into();
        settings
    }

    fn request(settings: &Settings) -> MailRequest {
        MailRequest::for_statement(
            settings,
            &ReportPeriod::new(2025, 5).unwrap(),
            vec!["board@cedar.example".into()],
            vec![],
        )
    }

    #[test]
    fn test_send_request_delivers_once() {
        let settings = settings();
        let mailer = RecordingMailer::default();

        send_request(&mailer, &settings, &request(&settings)).unwrap();
        assert_eq!(mailer.sent.borrow().len(), 1);
    }

    #[test]
    fn test_send_request_skips_invalid() {
        let settings = settings();
        let mailer = RecordingMailer::default();
        let mut request = request(&settings);
        request.recipients.clear();

        assert!(send_request(&mailer, &settings, &request).is_err());
        assert!(mailer.sent.borrow().is_empty());
    }

    #[test]
    fn test_send_failure_is_mail_error() {
        let settings = settings();
        let err = send_request(&FailingMailer, &settings, &request(&settings)).unwrap_err();
        assert!(matches!(err, CashflowError::Mail(_)));
    }

    #[test]
    fn test_smtp_mailer_requires_host() {
        let mut mail = MailSettings::default();
        mail.smtp_host = String::new();
        assert!(SmtpMailer::new(&mail, &SecureString::new("x")).is_err());

        let mail = MailSettings::default();
        assert!(SmtpMailer::new(&mail, &SecureString::new("app-password")).is_ok());
    }
}
