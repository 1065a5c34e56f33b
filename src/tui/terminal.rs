//! Terminal setup and teardown
//!
//! Raw mode and the alternate screen are restored on exit and on panic.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;

use crate::config::{CashflowPaths, Settings};
use crate::models::ReportPeriod;
use crate::storage::Storage;

use super::app::App;
use super::event::EventHandler;
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the statement editor on `period`
pub fn run_tui(
    storage: &Storage,
    settings: &Settings,
    paths: &CashflowPaths,
    period: ReportPeriod,
) -> Result<()> {
    // Load before touching the terminal so a bad statement file is reported plainly
    let mut app = App::new(storage, settings, paths, period)?;
    tracing::info!(period = %period, "tui started");

    let mut terminal = init_terminal()?;
    let events = EventHandler::default();

    let outcome = (|| -> Result<()> {
        while !app.should_quit {
            terminal.draw(|frame| super::views::render(frame, &app))?;
            handle_event(&mut app, events.next()?)?;
        }
        Ok(())
    })();

    restore_terminal()?;
    outcome?;

    if let Some(message) = app.exit_message.take() {
        eprintln!("{}", message);
    }
    tracing::info!("tui stopped");

    Ok(())
}
