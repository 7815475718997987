//! # Validation Module
//!
//! Checks applied where data enters the draft engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Collaborator boundary (THIS MODULE)                           │
//! │  ├── CatalogProduct / LotRecord shape and ranges                        │
//! │  └── Typed field edits (price, discount)                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: LineItemStore                                                 │
//! │  └── Quantity clamping with advisories (never rejects)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── Stock, pricing and invoicing rules on submission                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::validation::validate_non_negative;
//! use mostrador_core::Money;
//!
//! assert!(validate_non_negative("unit_price", Money::from_minor(1000)).is_ok());
//! assert!(validate_non_negative("unit_price", Money::from_minor(-1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CatalogProduct, LotRecord};
use crate::MAX_DRAFT_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a product name copied into a line.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates that a monetary field is zero or positive.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates that there is room for one more line.
pub fn validate_draft_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_DRAFT_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "sale lines".to_string(),
            min: 0,
            max: MAX_DRAFT_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Collaborator Payloads
// =============================================================================

/// Validates a product returned by the catalog lookup.
///
/// ## Rules
/// - Name follows [`validate_product_name`]
/// - Price and stock are non-negative
/// - BOX products carry a box spec with at least one unit per box;
///   other units carry none
pub fn validate_catalog_product(product: &CatalogProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_non_negative("unit_price", product.unit_price)?;

    if product.stock.tenths() < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }

    match (&product.box_spec, product.unit_of_measure.is_box()) {
        (Some(spec), true) => {
            if spec.units_per_box == 0 {
                return Err(ValidationError::OutOfRange {
                    field: "units_per_box".to_string(),
                    min: 1,
                    max: u32::MAX as i64,
                });
            }
            validate_non_negative("box_unit_price", spec.box_unit_price)?;
        }
        (None, true) => {
            return Err(ValidationError::Required {
                field: "box_spec".to_string(),
            });
        }
        (Some(_), false) => {
            return Err(ValidationError::Inconsistent {
                field: "box_spec".to_string(),
                reason: format!(
                    "product {} is sold by {}, not by the box",
                    product.product_id, product.unit_of_measure
                ),
            });
        }
        (None, false) => {}
    }

    if !product.unit_of_measure.is_fractional() && !product.stock.is_whole() {
        return Err(ValidationError::InvalidFormat {
            field: "stock".to_string(),
            reason: format!("{} products are counted in whole units", product.unit_of_measure),
        });
    }

    Ok(())
}

/// Validates a lot returned by the lot lookup.
pub fn validate_lot(lot: &LotRecord) -> ValidationResult<()> {
    validate_non_negative("lot unit_price", lot.unit_price)?;

    if lot.stock_remaining.tenths() < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock_remaining".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
