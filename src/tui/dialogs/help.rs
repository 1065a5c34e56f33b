//! Help dialog
//!
//! Lists the form's keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    // Clear the background
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

/// Help text lines
fn help_lines() -> Vec<Line<'static>> {
    vec![
        heading("Editing"),
        Line::from(""),
        key_line("↑/↓ Tab", "Move between fields"),
        key_line("0-9 , .", "Type an amount"),
        key_line("Enter", "Apply the amount and move on"),
        key_line("Esc", "Revert the amount being typed"),
        key_line("Ctrl-D", "Set the preparation date to today"),
        Line::from(""),
        heading("Statement"),
        Line::from(""),
        key_line("Ctrl-S", "Save"),
        key_line("Ctrl-E", "Save and export CSV, PDF, DOCX, JSON, YAML"),
        key_line("[ / ]", "Previous / next month"),
        Line::from(""),
        heading("Application"),
        Line::from(""),
        key_line("?", "Show this help"),
        key_line("q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Create a key binding line
fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>10}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(description),
    ])
}
