//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ← WRONG                         │
//! │                                                                     │
//! │  OUR SOLUTION: integer cents                                        │
//! │    A sale of 3 × $7.00 is exactly 2100 cents, and deleting that     │
//! │    sale restores inventory value to exactly what it was before.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decimal strings appear in exactly two places: CSV columns and the
//! `bankBalance` setting value. Both go through [`Money`]'s `Display` /
//! `FromStr` so the dot never touches arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: net profit can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde as plain integer**: cents travel unchanged over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use shopbook_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, absolute).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, failing on overflow.
    ///
    /// Used for `total = quantity × price`; quantities are bounded by
    /// validation but the overflow check keeps the arithmetic honest for
    /// caller-supplied values.
    ///
    /// ## Example
    /// ```rust
    /// use shopbook_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(700);
    /// let total = unit_price.checked_mul_quantity(3).unwrap();
    /// assert_eq!(total.cents(), 2100);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Saturating subtraction, clamped at i64 bounds.
    #[inline]
    pub const fn saturating_sub(&self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Display renders a plain decimal string ("12.34", "-0.05").
///
/// This is the canonical text form used in CSV columns and the bankBalance
/// setting; `FromStr` parses it back exactly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Error produced when a decimal money string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid money amount: {0:?}")]
pub struct ParseMoneyError(pub String);

/// Parses decimal strings with at most two fraction digits.
///
/// Accepted: "500", "500.5", "500.00", "-3.25". Anything else (thousands
/// separators, currency symbols, three decimals) is rejected so that a typo
/// in an imported CSV fails loudly instead of importing a wrong amount.
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseMoneyError(s.to_string());

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (major_str, minor_str) = match unsigned.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (unsigned, ""),
        };

        if major_str.is_empty() || !major_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if minor_str.len() > 2 || !minor_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let major: i64 = major_str.parse().map_err(|_| err())?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| err())? * 10,
            _ => minor_str.parse().map_err(|_| err())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(err)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_roundtrip() {
        let price = Money::from_cents(1099);
        assert_eq!(price.cents(), 1099);
        assert_eq!(price.major(), 10);
        assert_eq!(price.minor(), 99);
    }

    #[test]
    fn test_display_plain_decimal() {
        assert_eq!(Money::from_cents(2100).to_string(), "21.00");
        assert_eq!(Money::from_cents(705).to_string(), "7.05");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_accepts_common_forms() {
        assert_eq!("500".parse::<Money>().unwrap().cents(), 50000);
        assert_eq!("500.5".parse::<Money>().unwrap().cents(), 50050);
        assert_eq!("500.00".parse::<Money>().unwrap().cents(), 50000);
        assert_eq!("-3.25".parse::<Money>().unwrap().cents(), -325);
        assert_eq!(" 7.00 ".parse::<Money>().unwrap().cents(), 700);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("$5".parse::<Money>().is_err());
        assert!("1,000".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
    }

    #[test]
    fn test_display_parse_roundtrip() {
        for cents in [0, 1, 99, 100, 2100, -325, 123456789] {
            let m = Money::from_cents(cents);
            assert_eq!(m.to_string().parse::<Money>().unwrap(), m);
        }
    }

    #[test]
    fn test_checked_mul_quantity() {
        let price = Money::from_cents(700);
        assert_eq!(price.checked_mul_quantity(3).unwrap().cents(), 2100);
        assert!(Money::from_cents(i64::MAX).checked_mul_quantity(2).is_none());
    }

    #[test]
    fn test_arithmetic() {
        let sales = Money::from_cents(10000);
        let expenses = Money::from_cents(4000);
        assert_eq!((sales - expenses).cents(), 6000);

        let mut acc = Money::zero();
        acc += Money::from_cents(250);
        acc -= Money::from_cents(50);
        assert_eq!(acc.cents(), 200);
    }
}
