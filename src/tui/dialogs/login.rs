//! Login dialog
//!
//! Shown before the form when a username and password are configured.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::{App, LoginField};
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

/// Render the login dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 10, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", app.settings.association.name))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Length(1), // Username
            Constraint::Length(1), // Password
            Constraint::Length(1),
            Constraint::Min(1), // Error / hints
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("Sign in to edit cash flow statements"),
        rows[0],
    );

    let username = app
        .login
        .username
        .clone()
        .label("Username")
        .focused(app.login.focus == LoginField::Username);
    frame.render_widget(username, rows[1]);

    let password = TextInput::new()
        .label("Password")
        .content(app.login.password.as_str())
        .masked(true)
        .focused(app.login.focus == LoginField::Password);
    frame.render_widget(password, rows[2]);

    let footer = match &app.login.error {
        Some(error) => Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(
            "Enter: sign in  Tab: switch field  Esc: quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(footer), rows[4]);
}
