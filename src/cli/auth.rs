//! Login credential CLI commands

use clap::Subcommand;

use crate::auth::{self, SecureString, MIN_PASSWORD_LEN};
use crate::config::{CashflowPaths, Settings};
use crate::error::{CashflowError, CashflowResult};

/// Login management commands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Set the username and password required to open the form
    Set {
        /// Login username
        #[arg(short, long)]
        username: String,
    },

    /// Check a username and password against the stored credentials
    Check,

    /// Remove the login requirement (asks for the current password)
    Clear,

    /// Show whether a login is configured
    Status,
}

/// Handle auth commands
pub fn handle_auth_command(
    paths: &CashflowPaths,
    settings: &mut Settings,
    cmd: AuthCommands,
) -> CashflowResult<()> {
    match cmd {
        AuthCommands::Set { username } => {
            if settings.auth.is_configured() {
                println!("Changing the existing login.");
                verify_current(settings)?;
            }
            let password = prompt_new_password()?;
            auth::set_credentials(settings, &username, &password)?;
            settings.save(paths)?;
            println!("Login set for '{}'.", settings.auth.username);
        }

        AuthCommands::Check => {
            if !settings.auth.is_configured() {
                println!("No login is configured.");
                return Ok(());
            }
            verify_current(settings)?;
            println!("Credentials are correct.");
        }

        AuthCommands::Clear => {
            if !settings.auth.is_configured() {
                println!("No login is configured.");
                return Ok(());
            }
            verify_current(settings)?;
            auth::clear_credentials(settings);
            settings.save(paths)?;
            println!("Login removed. The form will open without a password.");
        }

        AuthCommands::Status => {
            if settings.auth.is_configured() {
                println!("Login required for user '{}'.", settings.auth.username);
            } else {
                println!("No login is configured.");
            }
        }
    }
    Ok(())
}

fn verify_current(settings: &Settings) -> CashflowResult<()> {
    let username = prompt_line("Username: ")?;
    let password = prompt_password("Password: ")?;
    auth::authenticate(settings, &username, &password)
}

/// Prompt for a new password with confirmation
fn prompt_new_password() -> CashflowResult<SecureString> {
    loop {
        let first = prompt_password("New password: ")?;
        if first.chars().count() < MIN_PASSWORD_LEN {
            println!(
                "Password must be at least {} characters. Please try again.",
                MIN_PASSWORD_LEN
            );
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if first.as_str() != second.as_str() {
            println!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> CashflowResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| CashflowError::Auth(format!("Failed to read password: {}", e)))
}

fn prompt_line(prompt: &str) -> CashflowResult<String> {
    use std::io::Write;

    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
