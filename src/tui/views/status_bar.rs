//! Status bar view
//!
//! Shows the period, save state, the latest message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.statement.period),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    spans.push(Span::raw(" "));
    if app.has_unsaved_changes() {
        spans.push(Span::styled("● unsaved", Style::default().fg(Color::Yellow)));
    } else {
        spans.push(Span::styled("saved", Style::default().fg(Color::Green)));
    }

    if let Some(ref status) = app.status {
        spans.push(Span::raw(" │ "));
        let color = if status.is_error {
            Color::Red
        } else {
            Color::White
        };
        spans.push(Span::styled(status.text.as_str(), Style::default().fg(color)));
    } else {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "^S save  ^E export  [ ] month  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
