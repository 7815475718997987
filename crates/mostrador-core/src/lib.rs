//! # mostrador-core: Pure Sale-Draft Logic for Mostrador
//!
//! This crate holds the client-side arithmetic of the sale-creation screen:
//! the line items of the sale being built, its totals and the change due.
//! Everything else (stock, pricing rules, invoicing, debt) is decided by the
//! backend after submission.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mostrador Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Sale-creation screen (UI)                    │   │
//! │  │   Product search ──► Line list ──► Discounts ──► Amount received │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Action                                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            mostrador-session (reducer, config, submit)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mostrador-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   store   │  │  totals   │  │  change   │  │ validation│   │   │
//! │  │   │ LineItem  │  │ SaleTotals│  │ ChangeDue │  │  payloads │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`quantity`] - Fixed-point quantities (tenths)
//! - [`types`] - Units, discount modes, catalog and lot payloads
//! - [`line_item`] - Line items and selection candidates
//! - [`store`] - The de-duplicating line store
//! - [`totals`] - Subtotal, discount, net total
//! - [`change`] - Change due from the amount received
//! - [`draft`] - The sale draft aggregate
//! - [`validation`] - Boundary validation
//! - [`error`] - Errors and advisories
//!
//! ## Example Usage
//!
//! ```rust
//! use mostrador_core::{
//!     CatalogProduct, ChangeDue, ChangeKind, DiscountMode, LineCandidate, Money, Quantity,
//!     SaleDraft, UnitOfMeasure,
//! };
//!
//! let yerba = CatalogProduct {
//!     product_id: 1,
//!     name: "Yerba 1kg".to_string(),
//!     unit_price: Money::from_minor(25_000),
//!     unit_of_measure: UnitOfMeasure::Unit,
//!     stock: Quantity::from_units(40),
//!     box_spec: None,
//! };
//!
//! let mut draft = SaleDraft::new(false, DiscountMode::None);
//! draft.add_or_merge(LineCandidate::from_product(&yerba).unwrap()).unwrap();
//! draft.set_quantity(0, "2").unwrap();
//!
//! let totals = draft.totals();
//! assert_eq!(totals.net_total, Money::from_minor(50_000));
//!
//! let due = ChangeDue::between(totals.net_total, Money::from_minor(100_000));
//! assert_eq!(due.kind, ChangeKind::Change);
//! assert_eq!(due.amount, Money::from_minor(50_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod change;
pub mod draft;
pub mod error;
pub mod line_item;
pub mod money;
pub mod quantity;
pub mod store;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use change::{ChangeDue, ChangeDueCalculator, ChangeKind};
pub use draft::SaleDraft;
pub use error::{Advisory, CoreError, CoreResult, ValidationError};
pub use line_item::{BoxLine, LineCandidate, LineItem};
pub use money::Money;
pub use quantity::Quantity;
pub use store::LineItemStore;
pub use totals::{SaleTotals, TotalsCalculator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct lines in one sale.
///
/// ## Business Reason
/// Keeps a runaway scanner or a stuck key from building an unsubmittable
/// sale; the invoice layout on the backend tops out well below this.
pub const MAX_DRAFT_ITEMS: usize = 100;
