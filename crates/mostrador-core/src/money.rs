//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A sale of 0.3 KG at ₲ 12.500 the kilo must be ₲ 3.750, every time.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + fixed-point quantities             │
//! │    12500 × 3 tenths / 10 = 3750                                         │
//! │    Any rounding happens in exactly one place (`times_quantity`)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guaraní has no minor unit, so for the default configuration one
//! `Money` unit is one ₲. Currencies with cents work the same way with
//! `currency_decimals = 2`.
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::Money;
//! use mostrador_core::quantity::Quantity;
//!
//! let price = Money::from_minor(12_500);
//! let line = price.times_quantity(Quantity::from_tenths(3));
//! assert_eq!(line.minor(), 3_750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::quantity::Quantity;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: a net total can legitimately go negative when the
///   discount is larger than the subtotal, and that must stay visible
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// let price = Money::from_minor(1_000);
    /// assert_eq!(price.minor(), 1_000);
    /// ```
    #[inline]
    pub const fn from_minor(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// The product is computed in tenths and rounded half away from zero,
    /// so `₲ 1.005 × 0.5` is `₲ 503`.
    ///
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use mostrador_core::quantity::Quantity;
    ///
    /// let unit_price = Money::from_minor(1_000);
    /// assert_eq!(unit_price.times_quantity(Quantity::from_units(2)).minor(), 2_000);
    /// assert_eq!(unit_price.times_quantity(Quantity::from_tenths(15)).minor(), 1_500);
    /// ```
    pub fn times_quantity(&self, qty: Quantity) -> Money {
        let product = self.0 as i128 * qty.tenths() as i128;
        let rounded = if product >= 0 {
            (product + 5) / 10
        } else {
            (product - 5) / 10
        };
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Parses a user-typed amount expressed in major units.
    ///
    /// Accepts an optional sign, digits and a single `.` or `,` as the
    /// decimal separator. Extra fraction digits beyond `decimals` are
    /// rounded. Returns `None` for empty or non-numeric input.
    ///
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// assert_eq!(Money::parse_major("50000", 0), Some(Money::from_minor(50_000)));
    /// assert_eq!(Money::parse_major("10,99", 2), Some(Money::from_minor(1_099)));
    /// assert_eq!(Money::parse_major("abc", 0), None);
    /// ```
    pub fn parse_major(raw: &str, decimals: u8) -> Option<Money> {
        parse_fixed(raw, decimals as u32).map(Money)
    }
}

// =============================================================================
// Fixed-point parsing
// =============================================================================

/// Parses a decimal string into an integer scaled by `10^decimals`.
///
/// Shared by [`Money::parse_major`] and the quantity parser.
pub(crate) fn parse_fixed(raw: &str, decimals: u32) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut parts = body.splitn(2, |c: char| c == '.' || c == ',');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let scale = 10_i64.checked_pow(decimals)?;
    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    let mut fraction: i64 = 0;
    let mut digits = frac_part.bytes();
    for _ in 0..decimals {
        let digit = digits.next().map(|b| (b - b'0') as i64).unwrap_or(0);
        fraction = fraction * 10 + digit;
    }
    if let Some(next) = digits.next() {
        if next >= b'5' {
            fraction += 1;
        }
    }

    let value = whole.checked_mul(scale)?.checked_add(fraction)?;
    Some(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds; typed input can reach them.

/// Plain integer rendering; currency symbols and separators are a
/// presentation concern handled by the session config.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((b - a).minor(), -500);
        assert_eq!((-a).minor(), -1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650].iter().map(|&m| Money::from_minor(m)).sum();
        assert_eq!(total.minor(), 1000);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_minor(1).is_positive());
        assert!(Money::from_minor(-1).is_negative());
        assert_eq!(Money::from_minor(-550).abs().minor(), 550);
    }

    #[test]
    fn test_times_quantity_whole_units() {
        let unit_price = Money::from_minor(299);
        assert_eq!(unit_price.times_quantity(Quantity::from_units(3)).minor(), 897);
    }

    #[test]
    fn test_times_quantity_rounds_half_away_from_zero() {
        // 1005 × 0.5 = 502.5 → 503
        let price = Money::from_minor(1005);
        assert_eq!(price.times_quantity(Quantity::from_tenths(5)).minor(), 503);

        let refund = Money::from_minor(-1005);
        assert_eq!(refund.times_quantity(Quantity::from_tenths(5)).minor(), -503);
    }

    #[test]
    fn test_parse_major_integers() {
        assert_eq!(Money::parse_major("1000", 0), Some(Money::from_minor(1000)));
        assert_eq!(Money::parse_major("  900 ", 0), Some(Money::from_minor(900)));
        assert_eq!(Money::parse_major("-25", 0), Some(Money::from_minor(-25)));
    }

    #[test]
    fn test_parse_major_decimals() {
        assert_eq!(Money::parse_major("10.99", 2), Some(Money::from_minor(1099)));
        assert_eq!(Money::parse_major("10,5", 2), Some(Money::from_minor(1050)));
        assert_eq!(Money::parse_major(".5", 2), Some(Money::from_minor(50)));
        // Fraction digits beyond the currency precision are rounded
        assert_eq!(Money::parse_major("1000.6", 0), Some(Money::from_minor(1001)));
        assert_eq!(Money::parse_major("1000.4", 0), Some(Money::from_minor(1000)));
    }

    #[test]
    fn test_parse_major_rejects_garbage() {
        assert_eq!(Money::parse_major("", 0), None);
        assert_eq!(Money::parse_major("   ", 0), None);
        assert_eq!(Money::parse_major("abc", 0), None);
        assert_eq!(Money::parse_major("12a", 0), None);
        assert_eq!(Money::parse_major("1.2.3", 0), None);
        assert_eq!(Money::parse_major("-", 0), None);
        assert_eq!(Money::parse_major("99999999999999999999", 0), None);
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let max = Money::from_minor(i64::MAX);
        let min = Money::from_minor(i64::MIN);

        assert_eq!((max + Money::from_minor(1)).minor(), i64::MAX);
        assert_eq!((min - Money::from_minor(1)).minor(), i64::MIN);
        assert_eq!((max - Money::from_minor(-1)).minor(), i64::MAX);
        assert_eq!((-min).minor(), i64::MAX);
        assert_eq!(min.abs().minor(), i64::MAX);

        let mut total = max;
        total += max;
        assert_eq!(total.minor(), i64::MAX);

        let sum: Money = [max, max, Money::from_minor(5)].into_iter().sum();
        assert_eq!(sum.minor(), i64::MAX);
    }

    #[test]
    fn test_times_quantity_saturates() {
        let price = Money::from_minor(i64::MAX / 2);
        assert_eq!(price.times_quantity(Quantity::from_units(1_000)).minor(), i64::MAX);

        let negative = Money::from_minor(i64::MIN / 2);
        assert_eq!(negative.times_quantity(Quantity::from_units(1_000)).minor(), i64::MIN);
    }
}
