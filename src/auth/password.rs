//! Password hashing with Argon2id
//!
//! Credentials are stored in settings as a PHC string, so the salt and cost
//! parameters travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::Settings;
use crate::error::{CashflowError, CashflowResult};

/// Shortest password accepted by [`set_credentials`]
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password into a PHC string
pub fn hash_password(password: &str) -> CashflowResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CashflowError::Auth(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored PHC string
///
/// A malformed hash is an error; a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, phc: &str) -> CashflowResult<bool> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| CashflowError::Auth(format!("Stored password hash is invalid: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CashflowError::Auth(format!("Failed to verify password: {}", e))),
    }
}

/// Store a new username and password in settings (caller saves)
pub fn set_credentials(settings: &mut Settings, username: &str, password: &str) -> CashflowResult<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CashflowError::Validation("Username cannot be empty".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CashflowError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    settings.auth.username = username.to_string();
    settings.auth.password_hash = Some(hash_password(password)?);
    tracing::info!(username, "login credentials updated");
    Ok(())
}

/// Remove the login requirement (caller saves)
pub fn clear_credentials(settings: &mut Settings) {
    settings.auth.username.clear();
    settings.auth.password_hash = None;
    tracing::info!("login credentials removed");
}

/// Check a login against the configured credentials
///
/// Always succeeds when no credentials are configured.
pub fn authenticate(settings: &Settings, username: &str, password: &str) -> CashflowResult<()> {
    let Some(hash) = settings.auth.password_hash.as_deref() else {
        return Ok(());
    };

    // Verify even on a username mismatch so both failures take the same time
    let password_ok = verify_password(password, hash)?;
    let username_ok = settings.auth.username == username.trim();

    if username_ok && password_ok {
        tracing::debug!(username, "login accepted");
        Ok(())
    } else {
        tracing::warn!(username, "login rejected");
        Err(CashflowError::Auth("Invalid username or password".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("anything", "not-a-hash").is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(
            hash_password("same password").unwrap(),
            hash_password("same password").unwrap()
        );
    }

    #[test]
    fn test_set_credentials_enforces_length() {
        let mut settings = Settings::default();
        let err = set_credentials(&mut settings, "treasurer", "short").unwrap_err();
        assert!(err.is_validation());
        assert!(!settings.auth.is_configured());

        assert!(set_credentials(&mut settings, "  ", "long enough").is_err());
    }

    #[test]
    fn test_authenticate() {
        let mut settings = Settings::default();
        assert!(authenticate(&settings, "", "").is_ok());

        set_credentials(&mut settings, "treasurer", "s3cret-pass").unwrap();
        assert!(authenticate(&settings, "treasurer", "s3cret-pass").is_ok());
        assert!(authenticate(&settings, "treasurer", "wrong-pass").is_err());
        assert!(authenticate(&settings, "admin", "s3cret-pass").is_err());

        clear_credentials(&mut settings);
        assert!(authenticate(&settings, "admin", "whatever").is_ok());
    }
}
