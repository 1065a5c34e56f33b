//! Statement form view
//!
//! Every field grouped under its section heading, with the focused row
//! highlighted and kept in view.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{FieldId, Section};
use crate::tui::app::App;

const AMOUNT_WIDTH: usize = 16;

/// Build the form lines; returns them with the line index of the focused field
fn form_lines(app: &App, width: usize) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut focused_line = 0;
    let focused = app.focused_field();

    for section in Section::ALL {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            section.title(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));

        for field in FieldId::in_section(section) {
            let is_focused = field == focused;
            if is_focused {
                focused_line = lines.len();
            }

            let amount = if is_focused && app.editor_dirty {
                format!("{}*", app.editor.value())
            } else {
                let value = app.statement.get(field);
                if value.is_zero() {
                    "-".to_string()
                } else {
                    value.format_grouped()
                }
            };

            let label = format!("  {}", field.label());
            let pad = width.saturating_sub(label.chars().count() + AMOUNT_WIDTH);
            let text = format!("{}{}{:>w$}", label, " ".repeat(pad), amount, w = AMOUNT_WIDTH);

            let style = if is_focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
    }

    (lines, focused_line)
}

/// Render the field list
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Statement ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (lines, focused_line) = form_lines(app, inner_width);

    // Keep the focused row on screen
    let scroll = focused_line.saturating_sub(inner_height.saturating_sub(2));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Render the editor for the focused field
pub fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Edit (Enter to apply, Esc to revert) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.editor_dirty {
            Color::Yellow
        } else {
            Color::DarkGray
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = app
        .editor
        .clone()
        .label(app.focused_field().label())
        .placeholder("0.00")
        .focused(true);
    frame.render_widget(input, inner);
}
