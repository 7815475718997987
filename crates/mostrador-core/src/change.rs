//! # Change Due
//!
//! What the cashier hands back, or what the customer still owes.
//!
//! ```text
//! amount = tendered − net_total
//!
//!   amount == 0  → EXACT         (0)
//!   amount  > 0  → CHANGE        (amount)
//!   amount  < 0  → INSUFFICIENT  (−amount, still owed)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Which of the three cases a tendered amount falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Exact,
    Change,
    Insufficient,
}

/// Result of comparing the tendered amount with the net total.
///
/// `amount` is never negative: change to give for `Change`, amount still
/// owed for `Insufficient`, zero for `Exact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChangeDue {
    pub kind: ChangeKind,
    pub amount: Money,
}

impl ChangeDue {
    /// Compares a tendered amount with the net total.
    ///
    /// ```rust
    /// use mostrador_core::change::{ChangeDue, ChangeKind};
    /// use mostrador_core::Money;
    ///
    /// let due = ChangeDue::between(Money::from_minor(900), Money::from_minor(1000));
    /// assert_eq!(due.kind, ChangeKind::Change);
    /// assert_eq!(due.amount, Money::from_minor(100));
    /// ```
    pub fn between(net_total: Money, tendered: Money) -> Self {
        let amount = tendered - net_total;
        if amount.is_zero() {
            ChangeDue {
                kind: ChangeKind::Exact,
                amount: Money::zero(),
            }
        } else if amount.is_positive() {
            ChangeDue {
                kind: ChangeKind::Change,
                amount,
            }
        } else {
            ChangeDue {
                kind: ChangeKind::Insufficient,
                amount: -amount,
            }
        }
    }

    /// True when the customer has paid at least the net total.
    pub fn is_covered(&self) -> bool {
        !matches!(self.kind, ChangeKind::Insufficient)
    }
}

impl Default for ChangeDue {
    fn default() -> Self {
        ChangeDue::between(Money::zero(), Money::zero())
    }
}

/// Turns the raw "amount received" field into a [`ChangeDue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDueCalculator {
    currency_decimals: u8,
}

impl ChangeDueCalculator {
    pub fn new(currency_decimals: u8) -> Self {
        ChangeDueCalculator { currency_decimals }
    }

    /// Parses the tendered input; empty or non-numeric input counts as 0.
    pub fn parse_tendered(&self, raw: &str) -> Money {
        Money::parse_major(raw, self.currency_decimals).unwrap_or_default()
    }

    pub fn calculate(&self, net_total: Money, raw_tendered: &str) -> ChangeDue {
        ChangeDue::between(net_total, self.parse_tendered(raw_tendered))
    }
}

impl Default for ChangeDueCalculator {
    /// Guaraní: no minor unit.
    fn default() -> Self {
        ChangeDueCalculator::new(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
