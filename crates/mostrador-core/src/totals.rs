//! # Totals
//!
//! Subtotal, discount and net total of a draft.
//!
//! ```text
//! subtotal       = Σ unit_price × quantity
//! total_discount = PER_ITEM     → Σ line discount
//!                  TOTAL_AMOUNT → manually entered amount
//!                  NONE         → 0
//! net_total      = subtotal − total_discount      (never floored)
//! ```
//!
//! A negative net total is a data-entry problem upstream (discount larger
//! than the sale). It is reported through [`SaleTotals::advisory`], not
//! corrected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::Advisory;
use crate::line_item::LineItem;
use crate::money::Money;
use crate::types::DiscountMode;

/// The three figures shown under the line list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub subtotal: Money,
    pub total_discount: Money,
    pub net_total: Money,
}

impl SaleTotals {
    /// Computes totals for a set of lines. Pure, O(n).
    ///
    /// ```rust
    /// use mostrador_core::totals::SaleTotals;
    /// use mostrador_core::{DiscountMode, Money};
    ///
    /// let totals = SaleTotals::calculate(&[], DiscountMode::TotalAmount, Money::from_minor(500));
    /// assert_eq!(totals.net_total, Money::from_minor(-500));
    /// ```
    pub fn calculate(items: &[LineItem], mode: DiscountMode, manual_discount: Money) -> Self {
        let subtotal: Money = items.iter().map(LineItem::gross).sum();
        let total_discount = match mode {
            DiscountMode::None => Money::zero(),
            DiscountMode::PerItem => items.iter().map(|line| line.discount).sum(),
            DiscountMode::TotalAmount => manual_discount,
        };

        SaleTotals {
            subtotal,
            total_discount,
            net_total: subtotal - total_discount,
        }
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.net_total.is_negative()
    }

    /// `NegativeNetTotal` when the discounts exceed the subtotal.
    pub fn advisory(&self) -> Option<Advisory> {
        self.is_negative().then(|| Advisory::NegativeNetTotal {
            net_total: self.net_total,
        })
    }
}

/// Keeps the most recent totals of a draft.
///
/// Recomputation is cheap, so there is no incremental bookkeeping; the
/// calculator only remembers the last result for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalsCalculator {
    last: SaleTotals,
}

impl TotalsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes and stores the totals.
    pub fn recompute(
        &mut self,
        items: &[LineItem],
        mode: DiscountMode,
        manual_discount: Money,
    ) -> SaleTotals {
        self.last = SaleTotals::calculate(items, mode, manual_discount);
        self.last
    }

    pub fn last(&self) -> SaleTotals {
        self.last
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
