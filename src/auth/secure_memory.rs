//! Secure memory handling for passwords
//!
//! Wraps secrets in `zeroize::Zeroizing` so they are wiped when dropped.

use std::fmt;
use std::ops::Deref;

use zeroize::Zeroizing;

/// A string that zeroes its buffer on drop
///
/// Use this for passwords read from the terminal or the environment.
#[derive(Clone, Default)]
pub struct SecureString {
    inner: Zeroizing<String>,
}

impl SecureString {
    pub fn new(s: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(s.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Append a character, as typed into a password field
    pub fn push(&mut self, c: char) {
        self.inner.push(c);
    }

    /// Remove the last character
    pub fn pop(&mut self) -> Option<char> {
        self.inner.pop()
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.inner.as_str()
    }
}

impl AsRef<str> for SecureString {
    fn as_ref(&self) -> &str {
        self.inner.as_str()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Never print the contents
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}
