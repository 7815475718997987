//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Hard errors (operation refused, draft unchanged)                       │
//! │  ├── CoreError        - bad line index, capacity, derived quantities    │
//! │  └── ValidationError  - collaborator payloads and typed field values    │
//! │                                                                         │
//! │  Advisories (operation applied after correction, user is told)          │
//! │  └── Advisory         - InvalidQuantity, StockExceeded,                 │
//! │                         NegativeNetTotal, SubmissionRejected            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError (session crate) → UI     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal. Every one of them leaves the draft in a
//! consistent state and the user re-prompted.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Errors that refuse a draft operation outright.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// No line item at the given position.
    ///
    /// ## When This Occurs
    /// - The UI holds a stale index after a removal
    #[error("No line item at position {index}")]
    LineNotFound { index: usize },

    /// Draft has reached the maximum number of distinct lines.
    #[error("A sale cannot have more than {max} lines")]
    DraftTooLarge { max: usize },

    /// Quantity of a BOX line is derived from its box and loose counts and
    /// cannot be typed directly.
    #[error("Quantity of line {index} is derived from boxes and loose units")]
    QuantityIsDerived { index: usize },

    /// Box counts were set on a line that is not sold by the box.
    #[error("Line {index} is not sold by the box")]
    NotABoxLine { index: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the collaborator boundary (catalog and lot payloads) and for
/// typed field edits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Monetary or stock value below zero.
    #[error("{field} cannot be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (unit code, date, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields of one payload disagree.
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },
}

// =============================================================================
// Advisory
// =============================================================================

/// A non-blocking notice produced when the engine corrected user input or
/// detected a condition the user must fix before submitting.
///
/// Serialized with a `kind` tag so the UI can pick a message template:
/// ```json
/// { "kind": "STOCK_EXCEEDED", "productName": "Yerba 1kg", "requested": 120, "available": 80 }
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Advisory {
    /// Entry was unparsable or below the unit minimum; `applied` is what
    /// was stored instead.
    #[error("Invalid quantity '{entered}' for {product_name}, using {applied}")]
    #[serde(rename_all = "camelCase")]
    InvalidQuantity {
        product_name: String,
        entered: String,
        applied: Quantity,
    },

    /// Requested quantity is above the available stock; `available` was
    /// stored instead.
    #[error("Only {available} of {product_name} available, {requested} requested")]
    #[serde(rename_all = "camelCase")]
    StockExceeded {
        product_name: String,
        requested: Quantity,
        available: Quantity,
    },

    /// Discounts exceed the subtotal. Never auto-corrected.
    #[error("Net total is negative ({net_total}), check discounts and prices")]
    #[serde(rename_all = "camelCase")]
    NegativeNetTotal { net_total: Money },

    /// The backend refused the sale. The draft is kept as it was.
    #[error("Sale was rejected: {reason}")]
    #[serde(rename_all = "camelCase")]
    SubmissionRejected { reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::LineNotFound { index: 3 };
        assert_eq!(err.to_string(), "No line item at position 3");

        let err = CoreError::DraftTooLarge { max: 100 };
        assert_eq!(err.to_string(), "A sale cannot have more than 100 lines");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBeNonNegative {
            field: "unit_price".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Validation error: unit_price cannot be negative"
        );
    }

    #[test]
    fn test_advisory_messages() {
        let advisory = Advisory::StockExceeded {
            product_name: "Yerba 1kg".to_string(),
            requested: Quantity::from_units(12),
            available: Quantity::from_units(8),
        };
        assert_eq!(
            advisory.to_string(),
            "Only 8 of Yerba 1kg available, 12 requested"
        );

        let advisory = Advisory::InvalidQuantity {
            product_name: "Queso".to_string(),
            entered: "abc".to_string(),
            applied: Quantity::ONE_TENTH,
        };
        assert_eq!(
            advisory.to_string(),
            "Invalid quantity 'abc' for Queso, using 0.1"
        );
    }

    #[test]
    fn test_advisory_serializes_with_kind_tag() {
        let advisory = Advisory::NegativeNetTotal {
            net_total: Money::from_minor(-200),
        };
        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["kind"], "NEGATIVE_NET_TOTAL");
        assert_eq!(json["netTotal"], -200);
    }
}
