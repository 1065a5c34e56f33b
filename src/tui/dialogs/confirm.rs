//! Unsaved-changes dialog
//!
//! Offered before quitting or switching months with unsaved edits.

use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::layout::centered_rect_fixed;

/// Key, action and key colour, in display order
const CHOICES: [(&str, &str, Color); 3] = [
    ("Y", "Discard", Color::Red),
    ("S", "Save first", Color::Green),
    ("N", "Cancel", Color::Yellow),
];

fn choice_line() -> Line<'static> {
    let mut spans = Vec::with_capacity(CHOICES.len() * 2);
    for (key, action, color) in CHOICES {
        spans.push(Span::styled(format!("[{}]", key), Style::default().fg(color)));
        spans.push(Span::raw(format!(" {}   ", action)));
    }
    Line::from(spans)
}

/// Draw the dialog over the form
pub fn render(frame: &mut Frame, message: &str) {
    let area = centered_rect_fixed(56, 7, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        choice_line(),
    ];

    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Unsaved changes ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(dialog, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_line_lists_every_key() {
        let text = choice_line().to_string();
        assert!(text.contains("[Y] Discard"));
        assert!(text.contains("[S] Save first"));
        assert!(text.contains("[N] Cancel"));
    }
}
