//! # Sale Submission
//!
//! The payload sent to the backend when a draft is submitted, the receipt it
//! answers with, and the collaborator trait that carries one to the other.
//!
//! ```text
//! SaleDraft + SaleHeader ──► SaleRequest ──► SaleSubmitter::submit ──► SubmissionReceipt
//!                                                       │
//!                                                       └──► SubmissionError
//! ```
//!
//! The backend owns stock deduction, invoicing and customer debt. A failure
//! is reported back to the user as-is and never retried here.

use async_trait::async_trait;
use chrono::NaiveDate;
use mostrador_core::{DiscountMode, Money, Quantity, SaleDraft, SaleTotals, UnitOfMeasure};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Request
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
    /// Added to the customer's account; the backend records the debt.
    Credit,
}

/// Sale-level fields entered on the screen besides the lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleHeader {
    pub customer_id: Option<i64>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Discount selection as sent to the backend.
///
/// ```json
/// { "mode": "TOTAL_AMOUNT", "amount": 5000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountRequest {
    None,
    PerItem,
    TotalAmount { amount: Money },
}

impl DiscountRequest {
    pub fn new(mode: DiscountMode, manual_discount: Money) -> Self {
        match mode {
            DiscountMode::None => DiscountRequest::None,
            DiscountMode::PerItem => DiscountRequest::PerItem,
            DiscountMode::TotalAmount => DiscountRequest::TotalAmount {
                amount: manual_discount,
            },
        }
    }
}

/// One line of a submitted sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequestItem {
    pub product_id: i64,
    pub lot_id: Option<i64>,
    pub quantity: Quantity,
    pub unit_price: Money,
    /// Zero unless the sale uses per-item discounts.
    pub discount: Money,
    /// `unit_price × quantity`, less `discount`.
    pub line_total: Money,
    pub unit_of_measure: UnitOfMeasure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_per_box: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loose_units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_unit_price: Option<Money>,
    #[ts(as = "Option<String>")]
    pub expiry: Option<NaiveDate>,
}

/// Everything the backend needs to record a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Lets the backend recognise a resubmitted draft.
    #[ts(as = "String")]
    pub draft_id: Uuid,
    pub header: SaleHeader,
    pub items: Vec<SaleRequestItem>,
    pub discount: DiscountRequest,
    pub totals: SaleTotals,
    pub tendered: Money,
}

impl SaleRequest {
    /// Builds the payload from the draft as it stands.
    pub fn from_draft(draft: &SaleDraft, header: SaleHeader, tendered: Money) -> Self {
        let per_item = draft.discount_mode() == DiscountMode::PerItem;

        let items = draft
            .items()
            .iter()
            .map(|line| SaleRequestItem {
                product_id: line.product_id,
                lot_id: line.lot_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                discount: if per_item { line.discount } else { Money::zero() },
                line_total: if per_item { line.net() } else { line.gross() },
                unit_of_measure: line.unit_of_measure,
                box_count: line.box_line.map(|b| b.box_count),
                units_per_box: line.box_line.map(|b| b.units_per_box),
                loose_units: line.box_line.map(|b| b.loose_units),
                box_unit_price: line.box_line.map(|b| b.box_unit_price),
                expiry: line.expiry,
            })
            .collect();

        SaleRequest {
            draft_id: draft.id(),
            header,
            items,
            discount: DiscountRequest::new(draft.discount_mode(), draft.manual_discount()),
            totals: draft.totals(),
            tendered,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// The backend's answer to an accepted sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub sale_id: i64,
    pub invoice_number: Option<String>,
}

/// Why a submission did not go through.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The backend refused the sale (stock gone, credit limit, ...).
    #[error("{reason}")]
    Rejected { reason: String },

    /// The backend could not be reached or answered garbage.
    #[error("Could not reach the server: {0}")]
    Transport(String),
}

// =============================================================================
// Collaborator
// =============================================================================

/// Sends a sale to the backend.
///
/// Implemented by the application's HTTP client; tests use an in-memory
/// fake.
#[async_trait]
pub trait SaleSubmitter: Send + Sync {
    async fn submit(&self, request: &SaleRequest) -> Result<SubmissionReceipt, SubmissionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::{BoxSpec, CatalogProduct, LineCandidate};

    fn product(product_id: i64, unit: UnitOfMeasure) -> CatalogProduct {
        CatalogProduct {
            product_id,
            name: format!("Producto {}", product_id),
            unit_price: Money::from_minor(1_000),
            unit_of_measure: unit,
            stock: Quantity::from_units(100),
            box_spec: unit.is_box().then_some(BoxSpec {
                units_per_box: 12,
                box_unit_price: Money::from_minor(11_000),
            }),
        }
    }

    #[test]
    fn test_discount_request_wire_format() {
        let json = serde_json::to_value(DiscountRequest::None).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "NONE" }));

        let json = serde_json::to_value(DiscountRequest::new(
            DiscountMode::TotalAmount,
            Money::from_minor(5_000),
        ))
        .unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "TOTAL_AMOUNT", "amount": 5000 }));
    }

    #[test]
    fn test_line_discounts_sent_only_in_per_item_mode() {
        let mut draft = SaleDraft::new(false, DiscountMode::None);
        draft
            .add_or_merge(LineCandidate::from_product(&product(1, UnitOfMeasure::Unit)).unwrap())
            .unwrap();
        draft.set_discount(0, Money::from_minor(100)).unwrap();

        let request = SaleRequest::from_draft(&draft, SaleHeader::default(), Money::zero());
        assert_eq!(request.items[0].discount, Money::zero());
        assert_eq!(request.items[0].line_total, Money::from_minor(1_000));

        draft.set_discount_mode(DiscountMode::PerItem);
        let request = SaleRequest::from_draft(&draft, SaleHeader::default(), Money::zero());
        assert_eq!(request.items[0].discount, Money::from_minor(100));
        assert_eq!(request.items[0].line_total, Money::from_minor(900));
        assert_eq!(request.totals.net_total, Money::from_minor(900));
        assert_eq!(request.draft_id, draft.id());
    }

    #[test]
    fn test_box_breakdown_is_carried() {
        let mut draft = SaleDraft::new(false, DiscountMode::None);
        draft
            .add_or_merge(LineCandidate::from_product(&product(2, UnitOfMeasure::Box)).unwrap())
            .unwrap();
        draft.set_box_quantities(0, 2, 3).unwrap();

        let request = SaleRequest::from_draft(&draft, SaleHeader::default(), Money::zero());
        let item = &request.items[0];
        assert_eq!(item.quantity, Quantity::from_units(27));
        assert_eq!(item.box_count, Some(2));
        assert_eq!(item.units_per_box, Some(12));
        assert_eq!(item.loose_units, Some(3));
        assert_eq!(item.box_unit_price, Some(Money::from_minor(11_000)));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["boxCount"], 2);
        assert_eq!(json["items"][0]["unitsPerBox"], 12);
        assert_eq!(json["items"][0]["boxUnitPrice"], 11_000);
        assert_eq!(json["header"]["paymentMethod"], "CASH");
    }

    #[test]
    fn test_unit_lines_omit_box_fields() {
        let mut draft = SaleDraft::new(false, DiscountMode::None);
        draft
            .add_or_merge(LineCandidate::from_product(&product(1, UnitOfMeasure::Unit)).unwrap())
            .unwrap();

        let request = SaleRequest::from_draft(&draft, SaleHeader::default(), Money::zero());
        let json = serde_json::to_value(&request).unwrap();
        let item = json["items"][0].as_object().unwrap();
        assert!(!item.contains_key("unitsPerBox"));
        assert!(!item.contains_key("boxUnitPrice"));
    }

    #[test]
    fn test_submission_error_messages() {
        let err = SubmissionError::Rejected {
            reason: "Stock changed".to_string(),
        };
        assert_eq!(err.to_string(), "Stock changed");

        let err = SubmissionError::Transport("timeout".to_string());
        assert_eq!(err.to_string(), "Could not reach the server: timeout");
    }
}
