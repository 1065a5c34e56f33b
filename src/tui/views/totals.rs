//! Totals panel
//!
//! Recomputed on every frame from the statement plus any valid pending edit.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::display::format_money;
use crate::models::{Money, StatementTotals};
use crate::tui::app::App;

fn total_line(label: &'static str, amount: Money, symbol: &str, bold: bool) -> Line<'static> {
    let mut style = if amount.is_negative() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::raw(format!("{:<22}", label)),
        Span::styled(format!("{:>16}", format_money(amount, symbol)), style),
    ])
}

/// Lines shown in the panel
pub fn totals_lines(totals: &StatementTotals, symbol: &str) -> Vec<Line<'static>> {
    vec![
        total_line("Beginning balance", totals.beginning_total, symbol, false),
        total_line("  Cash in bank", totals.beginning_bank, symbol, false),
        total_line("  Cash on hand", totals.beginning_on_hand, symbol, false),
        Line::from(""),
        total_line("Total receipts", totals.total_receipts, symbol, false),
        total_line("Total disbursements", totals.total_disbursements, symbol, false),
        total_line("Net change", totals.net_change, symbol, true),
        Line::from(""),
        total_line("Ending balance", totals.ending_total, symbol, true),
        total_line("  Cash in bank", totals.ending_bank, symbol, false),
        total_line("  Cash on hand", totals.ending_on_hand, symbol, false),
    ]
}

/// Render the totals panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let totals = app.live_totals();
    let mut lines = totals_lines(&totals, &app.settings.currency_symbol);

    let warnings = app.statement.validate();
    if !warnings.is_empty() {
        lines.push(Line::from(""));
        for warning in warnings {
            lines.push(Line::from(Span::styled(
                format!("! {}", warning),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let block = Block::default()
        .title(" Totals ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(ratatui::widgets::Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CashFlowStatement, FieldId, ReportPeriod};

    #[test]
    fn test_totals_lines() {
        let mut statement = CashFlowStatement::new(ReportPeriod::new(2025, 2).unwrap());
        statement
            .set(FieldId::BeginningBank, Money::from_cents(10_000))
            .unwrap();
        statement
            .set(FieldId::Electricity, Money::from_cents(25_000))
            .unwrap();

        let lines: Vec<String> = totals_lines(&statement.totals(), "$")
            .iter()
            .map(|l| l.to_string())
            .collect();

        assert!(lines[0].contains("$100.00"));
        assert!(lines[6].starts_with("Net change"));
        assert!(lines[6].contains("($250.00)"));
        assert!(lines[8].contains("($150.00)"));
    }
}
