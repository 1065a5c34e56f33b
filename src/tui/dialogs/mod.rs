//! Dialogs drawn over the form

pub mod confirm;
pub mod help;
pub mod login;
