//! # Line Item Store
//!
//! The ordered, de-duplicated set of lines of the sale being built.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Item Store Operations                           │
//! │                                                                         │
//! │  UI Action              Store Operation          Change                 │
//! │  ─────────              ───────────────          ──────                 │
//! │                                                                         │
//! │  Pick product/lot ─────► add_or_merge() ────────► push or merge         │
//! │  Edit quantity ────────► set_quantity() ────────► parse + clamp         │
//! │  Edit boxes/loose ─────► set_box_quantities() ──► derive quantity       │
//! │  Edit price/discount ──► set_unit_price() / set_discount()              │
//! │  Edit expiry ──────────► set_expiry()                                   │
//! │  Click remove ─────────► remove() ──────────────► items.remove(i)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by lot (lot tracking on) or by product (off)
//! - Every committed quantity lies in `[unit minimum, max_quantity]`; input
//!   outside that range is clamped and reported as an [`Advisory`]
//! - A BOX line may sit at quantity 0 until its boxes are entered
//!
//! ## Snapshots
//! Items live behind an `Arc`. [`LineItemStore::snapshot`] hands out the
//! current list; a later mutation copies on write, so a snapshot never
//! changes under its holder.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Advisory, CoreError, CoreResult};
use crate::line_item::{LineCandidate, LineItem};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::validation::{validate_draft_size, validate_non_negative};

/// Ordered collection of sale lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItemStore {
    items: Arc<Vec<LineItem>>,
    lot_tracking: bool,
}

impl LineItemStore {
    /// Creates an empty store.
    ///
    /// With `lot_tracking` on, selections of the same lot merge while
    /// different lots of one product stay on separate lines.
    pub fn new(lot_tracking: bool) -> Self {
        LineItemStore {
            items: Arc::new(Vec::new()),
            lot_tracking,
        }
    }

    pub fn lot_tracking(&self) -> bool {
        self.lot_tracking
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Shared immutable view of the current lines.
    pub fn snapshot(&self) -> Arc<Vec<LineItem>> {
        Arc::clone(&self.items)
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a selection, merging it into an existing line when one matches.
    ///
    /// ## Behavior
    /// - Match found, BOX line: one more box, quantity re-derived
    /// - Match found, other units: quantity increases by `candidate.quantity`
    /// - No match: a new line, starting at the candidate's quantity
    ///
    /// ## Returns
    /// - `Ok(None)` when applied as requested
    /// - `Ok(Some(advisory))` when the result was clamped to stock
    /// - `Err(DraftTooLarge)` when a new line would exceed the line limit
    pub fn add_or_merge(&mut self, candidate: LineCandidate) -> CoreResult<Option<Advisory>> {
        if let Some(index) = self.position_of(&candidate) {
            return self.merge_into(index, &candidate);
        }

        validate_draft_size(self.items.len()).map_err(|_| CoreError::DraftTooLarge {
            max: crate::MAX_DRAFT_ITEMS,
        })?;

        let entered = candidate.quantity.to_string();
        let mut line = candidate.into_line();
        let mut advisory = None;
        if line.box_line.is_none() {
            let (quantity, clamped) = bound_quantity(&line, line.quantity, entered);
            line.quantity = quantity;
            advisory = clamped;
        }

        debug!(
            product_id = line.product_id,
            lot_id = ?line.lot_id,
            quantity = %line.quantity,
            "Line added"
        );
        Arc::make_mut(&mut self.items).push(line);
        Ok(advisory)
    }

    /// Replaces a line's quantity from raw user input.
    ///
    /// KG/L lines parse one decimal, other lines parse whole numbers.
    /// Unparsable input falls back to the unit minimum.
    pub fn set_quantity(&mut self, index: usize, raw: &str) -> CoreResult<Option<Advisory>> {
        let line = self.line(index)?;
        if line.unit_of_measure.is_box() {
            return Err(CoreError::QuantityIsDerived { index });
        }

        let (quantity, advisory) = match line.unit_of_measure.parse_quantity(raw) {
            Some(requested) => bound_quantity(line, requested, raw.trim().to_string()),
            None => {
                let applied = line.min_quantity().min(line.max_quantity);
                let advisory = Advisory::InvalidQuantity {
                    product_name: line.product_name.clone(),
                    entered: raw.trim().to_string(),
                    applied,
                };
                (applied, Some(advisory))
            }
        };

        debug!(index, quantity = %quantity, clamped = advisory.is_some(), "Quantity set");
        self.line_mut(index)?.quantity = quantity;
        Ok(advisory)
    }

    /// Replaces the box and loose counts of a BOX line.
    ///
    /// Loose units that fill whole boxes are carried into `box_count`.
    /// A breakdown above the stock bound, or one totalling zero, is not
    /// applied; the previous counts stay and an advisory explains why.
    pub fn set_box_quantities(
        &mut self,
        index: usize,
        box_count: u32,
        loose_units: u32,
    ) -> CoreResult<Option<Advisory>> {
        let line = self.line(index)?;
        let boxes = line.box_line.ok_or(CoreError::NotABoxLine { index })?;
        let updated = boxes.with_counts(box_count, loose_units).normalized();
        let requested = updated.quantity();

        if requested > line.max_quantity {
            return Ok(Some(Advisory::StockExceeded {
                product_name: line.product_name.clone(),
                requested,
                available: line.max_quantity,
            }));
        }
        if requested < line.min_quantity() {
            return Ok(Some(Advisory::InvalidQuantity {
                product_name: line.product_name.clone(),
                entered: format!("{} x {} + {}", box_count, boxes.units_per_box, loose_units),
                applied: line.quantity,
            }));
        }

        let line = self.line_mut(index)?;
        line.box_line = Some(updated);
        line.quantity = requested;
        debug!(
            index,
            box_count = updated.box_count,
            loose_units = updated.loose_units,
            quantity = %requested,
            "Box quantities set"
        );
        Ok(None)
    }

    /// Replaces a line's unit price. Negative prices are refused.
    pub fn set_unit_price(&mut self, index: usize, price: Money) -> CoreResult<()> {
        self.line(index)?;
        validate_non_negative("unit_price", price)?;
        self.line_mut(index)?.unit_price = price;
        Ok(())
    }

    /// Replaces a line's discount. Negative discounts are refused.
    pub fn set_discount(&mut self, index: usize, discount: Money) -> CoreResult<()> {
        self.line(index)?;
        validate_non_negative("discount", discount)?;
        self.line_mut(index)?.discount = discount;
        Ok(())
    }

    pub fn set_expiry(&mut self, index: usize, expiry: Option<NaiveDate>) -> CoreResult<()> {
        self.line_mut(index)?.expiry = expiry;
        Ok(())
    }

    /// Deletes a line. There is no undo.
    pub fn remove(&mut self, index: usize) -> CoreResult<LineItem> {
        self.line(index)?;
        let removed = Arc::make_mut(&mut self.items).remove(index);
        debug!(index, product_id = removed.product_id, "Line removed");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items = Arc::new(Vec::new());
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn position_of(&self, candidate: &LineCandidate) -> Option<usize> {
        let by_lot = self.lot_tracking && candidate.lot_id.is_some();
        self.items.iter().position(|line| {
            if by_lot {
                line.product_id == candidate.product_id && line.lot_id == candidate.lot_id
            } else if self.lot_tracking {
                line.product_id == candidate.product_id && line.lot_id.is_none()
            } else {
                line.product_id == candidate.product_id
            }
        })
    }

    fn merge_into(&mut self, index: usize, candidate: &LineCandidate) -> CoreResult<Option<Advisory>> {
        let line = self.line(index)?;

        if let Some(boxes) = line.box_line {
            let updated = boxes.with_counts(boxes.box_count + 1, boxes.loose_units);
            let requested = updated.quantity();
            if requested > line.max_quantity {
                return Ok(Some(Advisory::StockExceeded {
                    product_name: line.product_name.clone(),
                    requested,
                    available: line.max_quantity,
                }));
            }
            let line = self.line_mut(index)?;
            line.box_line = Some(updated);
            line.quantity = requested;
            debug!(index, box_count = updated.box_count, "Box added to line");
            return Ok(None);
        }

        let requested = line.quantity + candidate.quantity;
        let (quantity, advisory) = bound_quantity(line, requested, requested.to_string());
        self.line_mut(index)?.quantity = quantity;
        debug!(index, quantity = %quantity, "Selection merged into line");
        Ok(advisory)
    }

    fn line(&self, index: usize) -> CoreResult<&LineItem> {
        self.items.get(index).ok_or(CoreError::LineNotFound { index })
    }

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut LineItem> {
        if index >= self.items.len() {
            return Err(CoreError::LineNotFound { index });
        }
        Arc::make_mut(&mut self.items)
            .get_mut(index)
            .ok_or(CoreError::LineNotFound { index })
    }
}

/// Clamps a requested quantity into `[unit minimum, max_quantity]`.
///
/// The stock bound wins when the two overlap, so a line never claims more
/// than is available.
fn bound_quantity(
    line: &LineItem,
    requested: Quantity,
    entered: String,
) -> (Quantity, Option<Advisory>) {
    if requested > line.max_quantity {
        let advisory = Advisory::StockExceeded {
            product_name: line.product_name.clone(),
            requested,
            available: line.max_quantity,
        };
        return (line.max_quantity, Some(advisory));
    }

    let min = line.min_quantity().min(line.max_quantity);
    if requested < min {
        let advisory = Advisory::InvalidQuantity {
            product_name: line.product_name.clone(),
            entered,
            applied: min,
        };
        return (min, Some(advisory));
    }

    (requested, None)
}

// =============================================================================
// Unit Tests
// =============================================================================
