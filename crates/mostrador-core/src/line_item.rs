//! # Line Items
//!
//! One row of a pending sale, and the candidate built from a catalog
//! selection before it enters the store.
//!
//! ## Snapshot Pattern
//! Name, price and stock bound are copied from the catalog (or the chosen
//! lot) at selection time. Later catalog changes do not touch a line that is
//! already in the draft; the backend re-validates on submission.
//!
//! ```text
//! CatalogProduct ──┐
//!                  ├──► LineCandidate ──► LineItemStore::add_or_merge ──► LineItem
//! LotRecord? ──────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{BoxSpec, CatalogProduct, LotRecord, UnitOfMeasure};
use crate::validation::{validate_catalog_product, validate_lot, ValidationResult};

// =============================================================================
// Box Line
// =============================================================================

/// Box breakdown of a line sold by the box.
///
/// `quantity = box_count × units_per_box + loose_units`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BoxLine {
    pub box_count: u32,
    pub units_per_box: u32,
    pub loose_units: u32,
    pub box_unit_price: Money,
}

impl BoxLine {
    /// An empty breakdown for a freshly selected box product.
    pub fn empty(spec: BoxSpec) -> Self {
        BoxLine {
            box_count: 0,
            units_per_box: spec.units_per_box,
            loose_units: 0,
            box_unit_price: spec.box_unit_price,
        }
    }

    /// Total loose units represented by this breakdown.
    pub fn quantity(&self) -> Quantity {
        let units = (self.box_count as i64)
            .saturating_mul(self.units_per_box as i64)
            .saturating_add(self.loose_units as i64);
        Quantity::from_units(units)
    }

    /// Carries loose units that fill whole boxes into `box_count`.
    pub fn normalized(&self) -> Self {
        if self.units_per_box == 0 {
            return *self;
        }
        BoxLine {
            box_count: self
                .box_count
                .saturating_add(self.loose_units / self.units_per_box),
            loose_units: self.loose_units % self.units_per_box,
            ..*self
        }
    }

    /// The same breakdown with different counts.
    pub fn with_counts(&self, box_count: u32, loose_units: u32) -> Self {
        BoxLine {
            box_count,
            loose_units,
            ..*self
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of a sale draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: i64,
    /// Product name at time of selection (frozen).
    pub product_name: String,
    pub quantity: Quantity,
    /// Unit price at time of selection; editable afterwards.
    pub unit_price: Money,
    /// Counted only when the draft is in per-item discount mode.
    pub discount: Money,
    pub unit_of_measure: UnitOfMeasure,
    /// Product stock, or the selected lot's remaining stock.
    pub max_quantity: Quantity,
    /// Present only for BOX lines.
    pub box_line: Option<BoxLine>,
    pub lot_id: Option<i64>,
    #[ts(as = "Option<String>")]
    pub expiry: Option<NaiveDate>,
}

impl LineItem {
    /// `unit_price × quantity`, before any discount.
    pub fn gross(&self) -> Money {
        self.unit_price.times_quantity(self.quantity)
    }

    /// Gross minus this line's own discount.
    pub fn net(&self) -> Money {
        self.gross() - self.discount
    }

    #[inline]
    pub fn min_quantity(&self) -> Quantity {
        self.unit_of_measure.min_quantity()
    }

    /// True for a BOX line whose boxes and loose units are still unset.
    pub fn is_pending_box_entry(&self) -> bool {
        self.unit_of_measure.is_box() && self.quantity.is_zero()
    }
}

// =============================================================================
// Line Candidate
// =============================================================================

/// A product selection on its way into the store.
///
/// `quantity` defaults to the unit's starting quantity and is the amount
/// added when the selection merges into an existing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCandidate {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Money,
    pub unit_of_measure: UnitOfMeasure,
    pub quantity: Quantity,
    pub max_quantity: Quantity,
    pub box_spec: Option<BoxSpec>,
    pub lot_id: Option<i64>,
    pub expiry: Option<NaiveDate>,
}

impl LineCandidate {
    /// Builds a candidate from a catalog product.
    pub fn from_product(product: &CatalogProduct) -> ValidationResult<Self> {
        validate_catalog_product(product)?;

        Ok(LineCandidate {
            product_id: product.product_id,
            product_name: product.name.trim().to_string(),
            unit_price: product.unit_price,
            unit_of_measure: product.unit_of_measure,
            quantity: product.unit_of_measure.default_quantity(),
            max_quantity: product.stock,
            box_spec: product.box_spec,
            lot_id: None,
            expiry: None,
        })
    }

    /// Builds a candidate from a product and one of its lots.
    ///
    /// The lot's price, remaining stock and expiry replace the product's.
    pub fn from_lot(product: &CatalogProduct, lot: &LotRecord) -> ValidationResult<Self> {
        validate_lot(lot)?;
        let candidate = LineCandidate::from_product(product)?;

        Ok(LineCandidate {
            unit_price: lot.unit_price,
            max_quantity: lot.stock_remaining,
            lot_id: Some(lot.lot_id),
            expiry: lot.expiry,
            ..candidate
        })
    }

    /// Overrides the quantity to add.
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// The line this candidate becomes when nothing merges with it.
    ///
    /// The quantity is not bounded here; the store clamps it.
    pub(crate) fn into_line(self) -> LineItem {
        let box_line = match (self.unit_of_measure.is_box(), self.box_spec) {
            (true, Some(spec)) => Some(BoxLine::empty(spec)),
            _ => None,
        };
        let quantity = match box_line {
            Some(boxes) => boxes.quantity(),
            None => self.quantity,
        };

        LineItem {
            product_id: self.product_id,
            product_name: self.product_name,
            quantity,
            unit_price: self.unit_price,
            discount: Money::zero(),
            unit_of_measure: self.unit_of_measure,
            max_quantity: self.max_quantity,
            box_line,
            lot_id: self.lot_id,
            expiry: self.expiry,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
