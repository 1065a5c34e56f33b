//! Terminal form for editing one month's statement
//!
//! `run_tui` owns the terminal; `App` holds all state and `handler` maps keys
//! onto it. Rendering lives in `views` and `dialogs`.

pub mod app;
pub mod dialogs;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
