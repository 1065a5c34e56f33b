//! Event handler for the TUI
//!
//! Routes keyboard events to the login screen, the open dialog or the form.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, App, LoginField, Screen};
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick | Event::Resize(_, _) => Ok(()),
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    // Ctrl-C always leaves, asking about unsaved work on the form
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        match app.screen {
            Screen::Login => app.quit(),
            Screen::Form => app.request_quit(),
        }
        return Ok(());
    }

    match app.screen {
        Screen::Login => handle_login_key(app, key),
        Screen::Form if app.has_dialog() => handle_dialog_key(app, key),
        Screen::Form => handle_form_key(app, key),
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.toggle_login_focus(),
        KeyCode::Enter => match app.login.focus {
            LoginField::Username => app.login.focus = LoginField::Password,
            LoginField::Password => app.submit_login()?,
        },
        KeyCode::Backspace => match app.login.focus {
            LoginField::Username => app.login.username.backspace(),
            LoginField::Password => {
                app.login.password.pop();
            }
        },
        KeyCode::Left if app.login.focus == LoginField::Username => app.login.username.move_left(),
        KeyCode::Right if app.login.focus == LoginField::Username => {
            app.login.username.move_right()
        }
        KeyCode::Char(c) => match app.login.focus {
            LoginField::Username => app.login.username.insert(c),
            LoginField::Password => app.login.password.push(c),
        },
        _ => {}
    }
    Ok(())
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match app.active_dialog {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::ConfirmQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.quit(),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                app.close_dialog();
                if app.save() {
                    app.quit();
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        ActiveDialog::ConfirmSwitch(period) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.close_dialog();
                app.load_period(period);
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                app.close_dialog();
                if app.save() {
                    app.load_period(period);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        ActiveDialog::None => {}
    }
    Ok(())
}

/// Characters accepted in an amount
fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '(' | ')')
}

fn handle_form_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => {
                app.save();
            }
            KeyCode::Char('e') => app.export_all(),
            KeyCode::Char('d') => app.set_prepared_today(),
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Down | KeyCode::Tab => app.select_next(),
        KeyCode::Up | KeyCode::BackTab => app.select_prev(),
        KeyCode::Enter => {
            if app.commit_editor() {
                app.select_next();
            }
        }
        KeyCode::Esc if app.editor_dirty => app.revert_editor(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => app.request_quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),
        KeyCode::Char('[') => app.prev_period(),
        KeyCode::Char(']') => app.next_period(),
        KeyCode::Backspace => app.edit_backspace(),
        KeyCode::Delete => app.edit_delete(),
        KeyCode::Left => app.editor.move_left(),
        KeyCode::Right => app.editor.move_right(),
        KeyCode::Home => app.editor.move_start(),
        KeyCode::End => app.editor.move_end(),
        KeyCode::Char(c) if is_amount_char(c) => app.edit_insert(c),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CashflowPaths, Settings};
    use crate::models::{FieldId, ReportPeriod};
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn ctrl(app: &mut App, c: char) {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn setup() -> (TempDir, CashflowPaths, Storage, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        (temp_dir, paths, storage, Settings::default())
    }

    fn period() -> ReportPeriod {
        ReportPeriod::new(2025, 11).unwrap()
    }

    #[test]
    fn test_typing_and_enter_commits() {
        let (_temp_dir, paths, storage, settings) = setup();
        let mut app = App::new(&storage, &settings, &paths, period()).unwrap();

        type_text(&mut app, "5,000");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.statement.get(FieldId::BeginningBank).cents(), 500_000);
        assert_eq!(app.focused_field(), FieldId::BeginningOnHand);
    }

    #[test]
    fn test_letters_are_not_amounts() {
        let (_temp_dir, paths, storage, settings) = setup();
        let mut app = App::new(&storage, &settings, &paths, period()).unwrap();

        type_text(&mut app, "1x2");
        assert_eq!(app.editor.value(), "12");
    }

    #[test]
    fn test_escape_reverts_then_quits() {
        let (_temp_dir, paths, storage, settings) = setup();
        let mut app = App::new(&storage, &settings, &paths, period()).unwrap();

        type_text(&mut app, "9");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.editor.value(), "");
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_confirmation() {
        let (_temp_dir, paths, storage, settings) = setup();
        let mut app = App::new(&storage, &settings, &paths, period()).unwrap();

        type_text(&mut app, "75");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.active_dialog, ActiveDialog::ConfirmQuit);

        press(&mut app, KeyCode::Char('n'));
        assert!(!app.has_dialog());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('s'));
        assert!(app.should_quit);
        assert!(storage.statements.exists(&period()));
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let (_temp_dir, paths, storage, settings) = setup();
        let mut app = App::new(&storage, &settings, &paths, period()).unwrap();

        ctrl(&mut app, 'd');
        assert!(app.dirty);
        ctrl(&mut app, 's');
        assert!(!app.dirty);
        assert!(storage.statements.exists(&period()));
    }

    #[test]
    fn test_period_keys_and_help() {
        let (_temp_dir, paths, storage, settings) = setup();
        let mut app = App::new(&storage, &settings, &paths, period()).unwrap();

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.statement.period, period().next());
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.statement.period, period().prev());

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.active_dialog, ActiveDialog::Help);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.has_dialog());
    }

    #[test]
    fn test_login_keys() {
        let (_temp_dir, paths, storage, mut settings) = setup();
        crate::auth::set_credentials(&mut settings, "admin", "letmein123").unwrap();
        let mut app = App::new(&storage, &settings, &paths, period()).unwrap();

        type_text(&mut app, "admin");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.login.focus, LoginField::Password);
        type_text(&mut app, "letmein123");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Form);
    }
}
