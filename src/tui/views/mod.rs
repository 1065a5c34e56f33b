//! TUI Views module
//!
//! The statement form, the totals panel, the header and the status bar.

pub mod form;
pub mod status_bar;
pub mod totals;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{ActiveDialog, App, Screen};
use super::dialogs;
use super::layout::AppLayout;
use crate::report::format_date;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    if app.screen == Screen::Login {
        dialogs::login::render(frame, app);
        return;
    }

    let layout = AppLayout::new(frame.area());

    render_header(frame, app, layout.header);
    form::render(frame, app, layout.form);
    form::render_editor(frame, app, layout.editor);
    totals::render(frame, app, layout.totals);
    status_bar::render(frame, app, layout.status_bar);

    match app.active_dialog {
        ActiveDialog::None => {}
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::ConfirmQuit => {
            dialogs::confirm::render(frame, "You have unsaved changes. Quit anyway?")
        }
        ActiveDialog::ConfirmSwitch(period) => dialogs::confirm::render(
            frame,
            &format!("You have unsaved changes. Open {} anyway?", period.label()),
        ),
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let settings = app.settings;
    let statement = &app.statement;

    let line = Line::from(vec![
        Span::styled(
            settings.association.name.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("Cash Flow Statement: {}", statement.period.label()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::raw(format!(
            "Prepared on {}",
            format_date(statement.prepared_on, &settings.date_format)
        )),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
}
