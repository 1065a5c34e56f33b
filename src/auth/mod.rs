//! Login for the statement form
//!
//! A single username and Argon2id password hash live in settings. When no
//! hash is configured the form opens without a login.

pub mod password;
pub mod secure_memory;

pub use password::{
    authenticate, clear_credentials, hash_password, set_credentials, verify_password,
    MIN_PASSWORD_LEN,
};
pub use secure_memory::SecureString;

/// Failed logins allowed before the session ends
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Counts failed logins in one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginAttempts {
    failures: u32,
}

impl LoginAttempts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; returns true once the limit is reached
    pub fn record_failure(&mut self) -> bool {
        self.failures = (self.failures + 1).min(MAX_LOGIN_ATTEMPTS);
        self.is_exhausted()
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn remaining(&self) -> u32 {
        MAX_LOGIN_ATTEMPTS - self.failures
    }

    pub fn is_exhausted(&self) -> bool {
        self.failures >= MAX_LOGIN_ATTEMPTS
    }
}
