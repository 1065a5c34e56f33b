//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations and formatting with thousands
//! separators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted on the form: 999,999,999,999.99
    ///
    /// Summing every field at this cap stays far inside `i64`, so totals
    /// cannot overflow.
    pub const MAX: Money = Money(99_999_999_999_999);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use cashflow::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    pub const fn from_dollars_cents(dollars: i64, cents: i64) -> Self {
        Self(dollars * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse a money amount from user input
    ///
    /// Accepts `1234.5`, `1,234.50`, `$1,234.50`, `-12`, and the accounting
    /// form `(12.00)` for negatives. Any leading currency symbol is ignored.
    /// More than two fraction digits is an error rather than a silent
    /// truncation, and so is a minus sign inside parentheses or a magnitude
    /// above [`Money::MAX`].
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(input.trim().to_string());

        let mut s = input.trim();
        let mut negative = false;

        if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
            negative = true;
            s = s[1..s.len() - 1].trim();
        }
        if let Some(rest) = s.strip_prefix('-') {
            if negative {
                return Err(invalid());
            }
            negative = true;
            s = rest.trim_start();
        }

        // Currency symbol, then an optional sign written after it ("$-5")
        s = s.trim_start_matches(|c: char| {
            !c.is_ascii_digit() && c != '.' && c != ',' && c != '-'
        });
        if let Some(rest) = s.strip_prefix('-') {
            if negative {
                return Err(invalid());
            }
            negative = true;
            s = rest;
        }

        if s.is_empty() {
            return Err(invalid());
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let digits = strip_grouping(int_part).ok_or_else(invalid)?;

        if !frac_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_part.len() > 2 {
            return Err(MoneyParseError::TooManyDecimals(input.trim().to_string()));
        }

        let overflow = || MoneyParseError::Overflow(input.trim().to_string());

        let units: i64 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| overflow())?
        };

        let cents: i64 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac_part.parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .filter(|v| *v <= Self::MAX.0)
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format as `1,234.50` with no currency symbol
    pub fn format_grouped(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}.{:02}",
            sign,
            group_thousands(self.0.unsigned_abs() / 100),
            self.cents_part()
        )
    }

    /// Format as `1234.50`: no grouping, no symbol. Used for CSV cells.
    pub fn format_plain(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}.{:02}",
            sign,
            self.0.unsigned_abs() / 100,
            self.cents_part()
        )
    }

    /// Format with a currency symbol and thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}", symbol, self.abs().format_grouped())
        } else {
            format!("{}{}", symbol, self.format_grouped())
        }
    }
}

/// Remove thousands separators, checking that groups are well formed
fn strip_grouping(int_part: &str) -> Option<String> {
    if !int_part.contains(',') {
        return int_part
            .chars()
            .all(|c| c.is_ascii_digit())
            .then(|| int_part.to_string());
    }

    let groups: Vec<&str> = int_part.split(',').collect();
    let (first, rest) = groups.split_first()?;

    if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !rest
        .iter()
        .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    Some(groups.concat())
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooManyDecimals(String),
    Overflow(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooManyDecimals(s) => {
                write!(f, "At most two decimal places allowed: {}", s)
            }
            MoneyParseError::Overflow(s) => write!(f, "Amount too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
