//! # Sale Draft
//!
//! The aggregate behind the sale-creation screen: the line store, the
//! discount selection and the totals derived from both.
//!
//! ## Lifecycle
//! ```text
//! ┌──────────┐  add/edit/remove   ┌──────────┐   submit ok / cancel   ┌───────────┐
//! │ created  │───────────────────►│ in edit  │───────────────────────►│ discarded │
//! │ (empty)  │                    │          │                        │           │
//! └──────────┘                    └──────────┘                        └───────────┘
//! ```
//!
//! A draft lives for one screen session and is never persisted. Every
//! mutation recomputes the totals before returning, so `totals()` is always
//! current.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{Advisory, CoreResult};
use crate::line_item::{LineCandidate, LineItem};
use crate::money::Money;
use crate::store::LineItemStore;
use crate::totals::{SaleTotals, TotalsCalculator};
use crate::types::DiscountMode;
use crate::validation::validate_non_negative;

/// A sale being built.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    id: Uuid,
    created_at: DateTime<Utc>,
    store: LineItemStore,
    discount_mode: DiscountMode,
    manual_discount: Money,
    totals: TotalsCalculator,
}

impl SaleDraft {
    /// Creates an empty draft.
    pub fn new(lot_tracking: bool, discount_mode: DiscountMode) -> Self {
        SaleDraft {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            store: LineItemStore::new(lot_tracking),
            discount_mode,
            manual_discount: Money::zero(),
            totals: TotalsCalculator::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[LineItem] {
        self.store.items()
    }

    pub fn store(&self) -> &LineItemStore {
        &self.store
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn discount_mode(&self) -> DiscountMode {
        self.discount_mode
    }

    pub fn manual_discount(&self) -> Money {
        self.manual_discount
    }

    pub fn totals(&self) -> SaleTotals {
        self.totals.last()
    }

    // -------------------------------------------------------------------------
    // Line operations
    // -------------------------------------------------------------------------

    pub fn add_or_merge(&mut self, candidate: LineCandidate) -> CoreResult<Option<Advisory>> {
        let advisory = self.store.add_or_merge(candidate)?;
        self.recompute();
        Ok(advisory)
    }

    pub fn set_quantity(&mut self, index: usize, raw: &str) -> CoreResult<Option<Advisory>> {
        let advisory = self.store.set_quantity(index, raw)?;
        self.recompute();
        Ok(advisory)
    }

    pub fn set_box_quantities(
        &mut self,
        index: usize,
        box_count: u32,
        loose_units: u32,
    ) -> CoreResult<Option<Advisory>> {
        let advisory = self.store.set_box_quantities(index, box_count, loose_units)?;
        self.recompute();
        Ok(advisory)
    }

    pub fn set_unit_price(&mut self, index: usize, price: Money) -> CoreResult<()> {
        self.store.set_unit_price(index, price)?;
        self.recompute();
        Ok(())
    }

    pub fn set_discount(&mut self, index: usize, discount: Money) -> CoreResult<()> {
        self.store.set_discount(index, discount)?;
        self.recompute();
        Ok(())
    }

    pub fn set_expiry(&mut self, index: usize, expiry: Option<NaiveDate>) -> CoreResult<()> {
        self.store.set_expiry(index, expiry)
    }

    pub fn remove(&mut self, index: usize) -> CoreResult<LineItem> {
        let removed = self.store.remove(index)?;
        self.recompute();
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Discount selection
    // -------------------------------------------------------------------------

    pub fn set_discount_mode(&mut self, mode: DiscountMode) {
        self.discount_mode = mode;
        self.recompute();
    }

    /// Sets the amount used in `TOTAL_AMOUNT` mode. Negative amounts are
    /// refused.
    pub fn set_manual_discount(&mut self, amount: Money) -> CoreResult<()> {
        validate_non_negative("total discount", amount)?;
        self.manual_discount = amount;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.totals
            .recompute(self.store.items(), self.discount_mode, self.manual_discount);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
