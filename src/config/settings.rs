//! User settings for the cash flow tool
//!
//! Manages association details, report signatories, mail delivery, and the
//! login credential. Settings live in a single JSON file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::CashflowPaths;
use crate::error::CashflowError;

/// Association details printed on every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationSettings {
    /// Registered association name
    #[serde(default = "default_association_name")]
    pub name: String,

    /// Postal address, printed under the name
    #[serde(default)]
    pub address: String,
}

impl Default for AssociationSettings {
    fn default() -> Self {
        Self {
            name: default_association_name(),
            address: String::new(),
        }
    }
}

/// Names on the signature block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signatories {
    #[serde(default)]
    pub prepared_by: String,
    #[serde(default)]
    pub checked_by: String,
    #[serde(default)]
    pub approved_by: String,
}

/// Transport security for the SMTP connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailSecurity {
    /// Implicit TLS (port 465)
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS (port 587)
    StartTls,
    /// Unencrypted, for local relays only
    None,
}

impl std::fmt::Display for MailSecurity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Tls => "tls",
            Self::StartTls => "starttls",
            Self::None => "none",
        })
    }
}

impl std::str::FromStr for MailSecurity {
    type Err = CashflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tls" | "ssl" => Ok(Self::Tls),
            "starttls" => Ok(Self::StartTls),
            "none" | "plain" => Ok(Self::None),
            other => Err(CashflowError::Config(format!(
                "Unknown mail security '{}': expected tls, starttls or none",
                other
            ))),
        }
    }
}

/// SMTP delivery settings
///
/// The password is never stored here; it is read from the environment or
/// prompted for at send time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub security: MailSecurity,

    /// SMTP login, usually the sender mailbox
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub from_address: String,

    #[serde(default)]
    pub from_name: String,

    #[serde(default)]
    pub default_recipients: Vec<String>,

    /// Supports `{association}` and `{period}` placeholders
    #[serde(default = "default_subject_template")]
    pub subject_template: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            security: MailSecurity::default(),
            username: String::new(),
            from_address: String::new(),
            from_name: String::new(),
            default_recipients: Vec::new(),
            subject_template: default_subject_template(),
        }
    }
}

/// Login credential for the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub username: String,

    /// Argon2 PHC string; `None` disables the login check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl AuthSettings {
    /// Whether a login is required
    pub fn is_configured(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub association: AssociationSettings,

    #[serde(default)]
    pub signatories: Signatories,

    /// Currency symbol used on printed documents
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Override for the export directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Seed a new month's beginning balance from the previous ending balance
    #[serde(default = "default_carry_forward")]
    pub carry_forward: bool,

    #[serde(default)]
    pub mail: MailSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_association_name() -> String {
    "Homeowners Association".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%B %d, %Y".to_string()
}

fn default_carry_forward() -> bool {
    true
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_subject_template() -> String {
    "{association} Cash Flow Statement - {period}".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            association: AssociationSettings::default(),
            signatories: Signatories::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            output_dir: None,
            carry_forward: default_carry_forward(),
            mail: MailSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &CashflowPaths) -> Result<Self, CashflowError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CashflowError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CashflowError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CashflowPaths) -> Result<(), CashflowError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CashflowError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CashflowError::Io(format!("Failed to write settings file: {}", e)))?;

        tracing::debug!(path = %paths.settings_file().display(), "settings saved");
        Ok(())
    }

    /// Directory exported documents are written to
    pub fn export_dir(&self, paths: &CashflowPaths) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| paths.output_dir())
    }

    /// Update a setting from a dotted key, as used by `config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), CashflowError> {
        match key {
            "association.name" => self.association.name = value.to_string(),
            "association.address" => self.association.address = value.to_string(),
            "signatories.prepared_by" => self.signatories.prepared_by = value.to_string(),
            "signatories.checked_by" => self.signatories.checked_by = value.to_string(),
            "signatories.approved_by" => self.signatories.approved_by = value.to_string(),
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "date_format" => {
                if value.trim().is_empty() {
                    return Err(CashflowError::Config("date_format cannot be empty".into()));
                }
                self.date_format = value.to_string();
            }
            "output_dir" => {
                self.output_dir = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "carry_forward" => {
                self.carry_forward = parse_bool(value)
                    .ok_or_else(|| CashflowError::Config(format!("Not a boolean: {}", value)))?;
            }
            "mail.smtp_host" => self.mail.smtp_host = value.to_string(),
            "mail.smtp_port" => {
                self.mail.smtp_port = value
                    .trim()
                    .parse()
                    .map_err(|_| CashflowError::Config(format!("Invalid port: {}", value)))?;
            }
            "mail.security" => self.mail.security = value.parse()?,
            "mail.username" => self.mail.username = value.to_string(),
            "mail.from_address" => self.mail.from_address = value.to_string(),
            "mail.from_name" => self.mail.from_name = value.to_string(),
            "mail.default_recipients" => {
                self.mail.default_recipients = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            "mail.subject_template" => self.mail.subject_template = value.to_string(),
            other => {
                return Err(CashflowError::Config(format!(
                    "Unknown setting '{}'",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Keys accepted by [`Settings::set_value`]
    pub const KEYS: &'static [&'static str] = &[
        "association.name",
        "association.address",
        "signatories.prepared_by",
        "signatories.checked_by",
        "signatories.approved_by",
        "currency_symbol",
        "date_format",
        "output_dir",
        "carry_forward",
        "mail.smtp_host",
        "mail.smtp_port",
        "mail.security",
        "mail.username",
        "mail.from_address",
        "mail.from_name",
        "mail.default_recipients",
        "mail.subject_template",
    ];
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(settings.mail.smtp_port, 465);
        assert_eq!(settings.mail.security, MailSecurity::Tls);
        assert!(settings.carry_forward);
        assert!(!settings.auth.is_configured());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.association.name = "Maple Grove HOA".into();
        settings.signatories.prepared_by = "J. Cruz".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.association.name, "Maple Grove HOA");
        assert_eq!(loaded.signatories.prepared_by, "J. Cruz");
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"association": {"name": "Oak Ridge"}}"#).unwrap();
        assert_eq!(settings.association.name, "Oak Ridge");
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.mail.smtp_port, 465);
    }

    #[test]
    fn test_set_value() {
        let mut settings = Settings::default();
        settings.set_value("mail.smtp_port", "587").unwrap();
        settings.set_value("mail.security", "starttls").unwrap();
        settings
            .set_value("mail.default_recipients", "a@example.com, b@example.com,")
            .unwrap();
        settings.set_value("carry_forward", "no").unwrap();

        assert_eq!(settings.mail.smtp_port, 587);
        assert_eq!(settings.mail.security, MailSecurity::StartTls);
        assert_eq!(settings.mail.default_recipients.len(), 2);
        assert!(!settings.carry_forward);
    }

    #[test]
    fn test_set_value_rejects_unknown_and_invalid() {
        let mut settings = Settings::default();
        assert!(settings.set_value("nope", "x").is_err());
        assert!(settings.set_value("mail.smtp_port", "abc").is_err());
        assert!(settings.set_value("mail.security", "carrier-pigeon").is_err());
    }

    #[test]
    fn test_export_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        assert_eq!(settings.export_dir(&paths), paths.output_dir());

        settings.set_value("output_dir", "/tmp/reports").unwrap();
        assert_eq!(settings.export_dir(&paths), PathBuf::from("/tmp/reports"));
    }
}
