//! Application state for the TUI
//!
//! The App struct holds the statement being edited, the editor for the
//! focused field, the login state and any open dialog.

use chrono::Local;

use crate::auth::{self, LoginAttempts, SecureString};
use crate::config::paths::CashflowPaths;
use crate::config::settings::Settings;
use crate::error::CashflowResult;
use crate::export::{export_to_dir, ExportFormat};
use crate::models::{CashFlowStatement, FieldId, Money, ReportPeriod, StatementTotals};
use crate::services::StatementService;
use crate::storage::Storage;

use super::widgets::TextInput;

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    Login,
    #[default]
    Form,
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    /// Quit with unsaved changes
    ConfirmQuit,
    /// Switch period with unsaved changes
    ConfirmSwitch(ReportPeriod),
}

/// Field focused on the login screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login screen state
#[derive(Debug, Default)]
pub struct LoginState {
    pub username: TextInput,
    pub password: SecureString,
    pub focus: LoginField,
    pub attempts: LoginAttempts,
    pub error: Option<String>,
}

/// A transient message in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub paths: &'a CashflowPaths,

    pub should_quit: bool,
    pub screen: Screen,
    pub active_dialog: ActiveDialog,

    /// Statement being edited
    pub statement: CashFlowStatement,

    /// Whether the statement differs from what is saved
    pub dirty: bool,

    /// Index into `FieldId::ALL`
    pub selected: usize,

    /// Editor for the focused field
    pub editor: TextInput,

    /// Whether the editor holds uncommitted input
    pub editor_dirty: bool,

    pub login: LoginState,

    pub status: Option<StatusMessage>,

    /// Printed after the terminal is restored
    pub exit_message: Option<String>,
}

impl<'a> App<'a> {
    /// Open the form on a period, behind the login screen if one is configured
    pub fn new(
        storage: &'a Storage,
        settings: &'a Settings,
        paths: &'a CashflowPaths,
        period: ReportPeriod,
    ) -> CashflowResult<Self> {
        let statement = StatementService::new(storage, settings).open(period)?;
        let screen = if settings.auth.is_configured() {
            Screen::Login
        } else {
            Screen::Form
        };

        let mut app = Self {
            storage,
            settings,
            paths,
            should_quit: false,
            screen,
            active_dialog: ActiveDialog::None,
            statement,
            dirty: false,
            selected: 0,
            editor: TextInput::new(),
            editor_dirty: false,
            login: LoginState::default(),
            status: None,
            exit_message: None,
        };
        app.load_editor();
        Ok(app)
    }

    fn service(&self) -> StatementService<'a> {
        StatementService::new(self.storage, self.settings)
    }

    /// Quit immediately
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Quit, asking first when there are unsaved changes
    pub fn request_quit(&mut self) {
        if self.has_unsaved_changes() {
            self.open_dialog(ActiveDialog::ConfirmQuit);
        } else {
            self.quit();
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty || self.editor_dirty
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: message.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: message.into(),
            is_error: true,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    pub fn has_dialog(&self) -> bool {
        !matches!(self.active_dialog, ActiveDialog::None)
    }

    // Login

    /// Check the entered credentials
    pub fn submit_login(&mut self) -> CashflowResult<()> {
        let username = self.login.username.value().to_string();
        match auth::authenticate(self.settings, &username, &self.login.password) {
            Ok(()) => {
                self.login = LoginState::default();
                self.screen = Screen::Form;
                self.set_status(format!("Welcome, {}", username));
            }
            Err(e) => {
                self.login.password = SecureString::default();
                self.login.focus = LoginField::Password;
                if self.login.attempts.record_failure() {
                    self.exit_message = Some("Too many failed login attempts.".to_string());
                    self.quit();
                } else {
                    self.login.error = Some(format!(
                        "{} ({} attempt{} left)",
                        e,
                        self.login.attempts.remaining(),
                        if self.login.attempts.remaining() == 1 { "" } else { "s" }
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn toggle_login_focus(&mut self) {
        self.login.focus = match self.login.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    // Form

    pub fn focused_field(&self) -> FieldId {
        FieldId::ALL[self.selected]
    }

    /// Reset the editor to the focused field's stored amount
    pub fn load_editor(&mut self) {
        let amount = self.statement.get(self.focused_field());
        let text = if amount.is_zero() {
            String::new()
        } else {
            amount.format_plain()
        };
        self.editor.set_value(text);
        self.editor_dirty = false;
    }

    /// Parse the editor contents into the focused field
    ///
    /// Returns false and sets an error message on invalid input.
    pub fn commit_editor(&mut self) -> bool {
        if !self.editor_dirty {
            return true;
        }

        let field = self.focused_field();
        let raw = self.editor.value().trim();
        let parsed = if raw.is_empty() {
            Ok(Money::zero())
        } else {
            Money::parse(raw).map_err(|e| e.to_string())
        };

        let result = parsed.and_then(|amount| {
            self.statement
                .set(field, amount)
                .map_err(|e| e.to_string())
        });

        match result {
            Ok(()) => {
                self.dirty = true;
                self.load_editor();
                self.clear_status();
                true
            }
            Err(e) => {
                self.set_error(format!("{}: {}", field.label(), e));
                false
            }
        }
    }

    /// Discard uncommitted input in the editor
    pub fn revert_editor(&mut self) {
        self.load_editor();
        self.clear_status();
    }

    pub fn edit_insert(&mut self, c: char) {
        self.editor.insert(c);
        self.editor_dirty = true;
    }

    pub fn edit_backspace(&mut self) {
        self.editor.backspace();
        self.editor_dirty = true;
    }

    pub fn edit_delete(&mut self) {
        self.editor.delete();
        self.editor_dirty = true;
    }

    /// Move focus to another field, committing the current edit first
    pub fn select(&mut self, index: usize) {
        if !self.commit_editor() {
            return;
        }
        self.selected = index.min(FieldId::ALL.len() - 1);
        self.load_editor();
    }

    pub fn select_next(&mut self) {
        let next = (self.selected + 1) % FieldId::ALL.len();
        self.select(next);
    }

    pub fn select_prev(&mut self) {
        let prev = self
            .selected
            .checked_sub(1)
            .unwrap_or(FieldId::ALL.len() - 1);
        self.select(prev);
    }

    /// Totals including a valid uncommitted edit
    pub fn live_totals(&self) -> StatementTotals {
        if self.editor_dirty {
            let raw = self.editor.value().trim();
            let amount = if raw.is_empty() {
                Some(Money::zero())
            } else {
                Money::parse(raw).ok()
            };
            if let Some(amount) = amount {
                let mut preview = self.statement.clone();
                if preview.set(self.focused_field(), amount).is_ok() {
                    return preview.totals();
                }
            }
        }
        self.statement.totals()
    }

    /// Save the statement
    pub fn save(&mut self) -> bool {
        if !self.commit_editor() {
            return false;
        }
        match self.service().save(&self.statement) {
            Ok(()) => {
                self.dirty = false;
                let warnings = self.statement.validate();
                match warnings.first() {
                    Some(warning) => self.set_error(format!("Saved. Warning: {}", warning)),
                    None => self.set_status(format!("Saved {}", self.statement.period.label())),
                }
                true
            }
            Err(e) => {
                self.set_error(format!("Save failed: {}", e));
                false
            }
        }
    }

    /// Save, then write every export format
    pub fn export_all(&mut self) {
        if !self.save() {
            return;
        }
        let dir = self.settings.export_dir(self.paths);
        match export_to_dir(&self.statement, self.settings, &ExportFormat::ALL, &dir) {
            Ok(paths) => {
                self.set_status(format!("Exported {} files to {}", paths.len(), dir.display()))
            }
            Err(e) => self.set_error(format!("Export failed: {}", e)),
        }
    }

    /// Set the preparation date to today
    pub fn set_prepared_today(&mut self) {
        let today = Local::now().date_naive();
        if self.statement.prepared_on != today {
            self.statement.prepared_on = today;
            self.dirty = true;
        }
        self.set_status(format!("Prepared on {}", today));
    }

    /// Move to another period, asking first when there are unsaved changes
    pub fn switch_period(&mut self, period: ReportPeriod) {
        if self.has_unsaved_changes() {
            self.open_dialog(ActiveDialog::ConfirmSwitch(period));
        } else {
            self.load_period(period);
        }
    }

    /// Load a period, discarding unsaved changes
    pub fn load_period(&mut self, period: ReportPeriod) {
        match self.service().open(period) {
            Ok(statement) => {
                let is_new = !self.storage.statements.exists(&period);
                self.statement = statement;
                self.dirty = false;
                self.load_editor();
                if is_new {
                    self.set_status(format!("New statement for {}", period.label()));
                } else {
                    self.set_status(format!("Opened {}", period.label()));
                }
            }
            Err(e) => self.set_error(format!("Cannot open {}: {}", period, e)),
        }
    }

    pub fn prev_period(&mut self) {
        self.switch_period(self.statement.period.prev());
    }

    pub fn next_period(&mut self) {
        self.switch_period(self.statement.period.next());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        paths: CashflowPaths,
        storage: Storage,
        settings: Settings,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        Fixture {
            _temp_dir: temp_dir,
            paths,
            storage,
            settings: Settings::default(),
        }
    }

    fn period() -> ReportPeriod {
        ReportPeriod::new(2025, 5).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.edit_insert(c);
        }
    }

    #[test]
    fn test_starts_on_form_without_credentials() {
        let f = fixture();
        let app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();
        assert_eq!(app.screen, Screen::Form);
        assert_eq!(app.focused_field(), FieldId::BeginningBank);
    }

    #[test]
    fn test_commit_and_live_totals() {
        let f = fixture();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();

        app.select(FieldId::MonthlyDues.index());
        type_text(&mut app, "1,500.25");
        assert_eq!(app.live_totals().total_receipts.cents(), 150_025);
        assert_eq!(app.statement.totals().total_receipts.cents(), 0);

        app.select_next();
        assert_eq!(app.statement.get(FieldId::MonthlyDues).cents(), 150_025);
        assert!(app.dirty);
        assert_eq!(app.focused_field(), FieldId::DuesArrears);
    }

    #[test]
    fn test_invalid_input_keeps_focus() {
        let f = fixture();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();

        type_text(&mut app, "12.345");
        app.select_next();
        assert_eq!(app.selected, 0);
        assert!(app.status.as_ref().unwrap().is_error);

        app.revert_editor();
        app.select_next();
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_select_wraps() {
        let f = fixture();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();
        app.select_prev();
        assert_eq!(app.focused_field(), FieldId::EndingOnHand);
        app.select_next();
        assert_eq!(app.focused_field(), FieldId::BeginningBank);
    }

    #[test]
    fn test_save_and_quit_flow() {
        let f = fixture();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();

        type_text(&mut app, "100");
        app.request_quit();
        assert_eq!(app.active_dialog, ActiveDialog::ConfirmQuit);
        app.close_dialog();

        assert!(app.save());
        assert!(f.storage.statements.exists(&period()));
        app.request_quit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_switch_period_confirms_unsaved() {
        let f = fixture();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();

        type_text(&mut app, "250");
        assert!(app.commit_editor());
        app.next_period();
        assert_eq!(
            app.active_dialog,
            ActiveDialog::ConfirmSwitch(period().next())
        );

        app.close_dialog();
        app.save();
        app.next_period();
        assert_eq!(app.statement.period, period().next());
        // Carried forward from the saved month
        assert_eq!(app.statement.get(FieldId::BeginningBank).cents(), 25_000);
    }

    #[test]
    fn test_export_all_writes_files() {
        let f = fixture();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();
        type_text(&mut app, "10");
        app.export_all();

        let dir = f.settings.export_dir(&f.paths);
        assert!(dir.join("cash-flow-2025-05.pdf").exists());
        assert!(dir.join("cash-flow-2025-05.docx").exists());
        assert!(!app.dirty);
    }

    #[test]
    fn test_login_flow() {
        let mut f = fixture();
        auth::set_credentials(&mut f.settings, "treasurer", "open-sesame").unwrap();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();
        assert_eq!(app.screen, Screen::Login);

        app.login.username.set_value("treasurer");
        app.login.password = SecureString::new("wrong-pass");
        app.submit_login().unwrap();
        assert_eq!(app.screen, Screen::Login);
        assert!(app.login.error.as_ref().unwrap().contains("2 attempts left"));

        app.login.password = SecureString::new("open-sesame");
        app.submit_login().unwrap();
        assert_eq!(app.screen, Screen::Form);
    }

    #[test]
    fn test_login_lockout() {
        let mut f = fixture();
        auth::set_credentials(&mut f.settings, "treasurer", "open-sesame").unwrap();
        let mut app = App::new(&f.storage, &f.settings, &f.paths, period()).unwrap();

        for _ in 0..auth::MAX_LOGIN_ATTEMPTS {
            app.login.password = SecureString::new("nope");
            app.submit_login().unwrap();
        }
        assert!(app.should_quit);
        assert!(app.exit_message.is_some());
    }
}
