//! # Quantity Module
//!
//! Fixed-point quantities with one decimal place.
//!
//! Discrete products (UNIT, BOX) always hold whole numbers; weighed or
//! measured products (KG, L) may be sold in steps of 0.1. Storing tenths as
//! an `i64` keeps both cases exact:
//!
//! ```text
//! 3 units   → Quantity(30)
//! 0.1 KG    → Quantity(1)
//! 1.5 L     → Quantity(15)
//! ```
//!
//! On the wire a quantity is a plain JSON number (`24`, `1.5`); the tenths
//! representation never leaves the process.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::money::parse_fixed;

/// Number of tenths in one whole unit.
pub const TENTHS_PER_UNIT: i64 = 10;

/// A quantity expressed in tenths of the unit of measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Quantity(#[ts(type = "number")] i64);

impl Quantity {
    /// The smallest step for fractional units (0.1).
    pub const ONE_TENTH: Quantity = Quantity(1);

    /// One whole unit.
    pub const ONE: Quantity = Quantity(TENTHS_PER_UNIT);

    #[inline]
    pub const fn from_tenths(tenths: i64) -> Self {
        Quantity(tenths)
    }

    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units.saturating_mul(TENTHS_PER_UNIT))
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn tenths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when the quantity has no fractional part.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % TENTHS_PER_UNIT == 0
    }

    /// Parses a decimal entry such as `"1.5"` or `"0,3"`.
    ///
    /// A second decimal digit is rounded into the first, so `"0.25"`
    /// becomes 0.3.
    pub fn parse_decimal(raw: &str) -> Option<Quantity> {
        parse_fixed(raw, 1).map(Quantity)
    }

    /// Parses an entry for a discrete unit.
    ///
    /// The whole entry must be numeric; any fractional part is dropped,
    /// so `"2.7"` becomes 2.
    pub fn parse_integral(raw: &str) -> Option<Quantity> {
        parse_fixed(raw, 1)?;
        let int_part = raw
            .trim()
            .split(|c: char| c == '.' || c == ',')
            .next()
            .unwrap_or("");
        let whole = match int_part {
            "" | "-" | "+" => 0,
            digits => digits.parse::<i64>().ok()?,
        };
        Some(Quantity::from_units(whole))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        if abs % TENTHS_PER_UNIT == 0 {
            write!(f, "{}{}", sign, abs / TENTHS_PER_UNIT)
        } else {
            write!(f, "{}{}.{}", sign, abs / TENTHS_PER_UNIT, abs % TENTHS_PER_UNIT)
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.0 / TENTHS_PER_UNIT)
        } else {
            serializer.serialize_f64(self.0 as f64 / TENTHS_PER_UNIT as f64)
        }
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("quantity must be a finite number"));
        }
        Ok(Quantity((value * TENTHS_PER_UNIT as f64).round() as i64))
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0.saturating_add(other.0))
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0.saturating_sub(other.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Quantity::from_units(27).to_string(), "27");
        assert_eq!(Quantity::from_tenths(15).to_string(), "1.5");
        assert_eq!(Quantity::ONE_TENTH.to_string(), "0.1");
        assert_eq!(Quantity::from_tenths(-5).to_string(), "-0.5");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Quantity::parse_decimal("1.5"), Some(Quantity::from_tenths(15)));
        assert_eq!(Quantity::parse_decimal("0,3"), Some(Quantity::from_tenths(3)));
        assert_eq!(Quantity::parse_decimal("2"), Some(Quantity::from_units(2)));
        assert_eq!(Quantity::parse_decimal("0.25"), Some(Quantity::from_tenths(3)));
        assert_eq!(Quantity::parse_decimal("kilo"), None);
        assert_eq!(Quantity::parse_decimal(""), None);
    }

    #[test]
    fn test_parse_integral_drops_fraction() {
        assert_eq!(Quantity::parse_integral("3"), Some(Quantity::from_units(3)));
        assert_eq!(Quantity::parse_integral("2.7"), Some(Quantity::from_units(2)));
        assert_eq!(Quantity::parse_integral(".7"), Some(Quantity::zero()));
        assert_eq!(Quantity::parse_integral("-4"), Some(Quantity::from_units(-4)));
        assert_eq!(Quantity::parse_integral("x2"), None);
        assert_eq!(Quantity::parse_integral(""), None);
    }

    #[test]
    fn test_serde_as_plain_number() {
        assert_eq!(serde_json::to_string(&Quantity::from_units(24)).unwrap(), "24");
        assert_eq!(serde_json::to_string(&Quantity::from_tenths(15)).unwrap(), "1.5");

        let parsed: Quantity = serde_json::from_str("2.5").unwrap();
        assert_eq!(parsed, Quantity::from_tenths(25));
        let parsed: Quantity = serde_json::from_str("80").unwrap();
        assert_eq!(parsed, Quantity::from_units(80));
    }

    #[test]
    fn test_is_whole() {
        assert!(Quantity::from_units(4).is_whole());
        assert!(!Quantity::from_tenths(41).is_whole());
    }
}
