//! # Sale-Creation Flow
//!
//! The whole screen state lives in one [`FlowState`] value. Every user
//! action goes through [`reduce`], a pure function from the old state and
//! an [`Action`] to the new state. [`SaleFlow`] wraps the reducer and runs
//! the single awaited step, the submission.
//!
//! ## Phases
//! ```text
//!            add line                 submit (checks pass)
//! ┌───────┐ ─────────► ┌──────────────┐ ─────────────────► ┌────────────┐
//! │ EMPTY │            │ READY_TO_    │                    │ SUBMITTING │
//! │       │ ◄───────── │ SUBMIT       │ ◄───────────────── │            │
//! └───────┘ last line  └──────────────┘  rejected / failed └─────┬──────┘
//!     │      removed          │                                  │ accepted
//!     │        cancel         ▼                                  ▼
//!     └─────────────────► ┌───────────┐                    ┌───────────┐
//!                         │ CANCELLED │                    │ SUBMITTED │
//!                         └───────────┘                    └───────────┘
//! ```
//!
//! CANCELLED and SUBMITTED are terminal: later actions are ignored. While
//! SUBMITTING the draft is frozen, cancelling is refused, and only the
//! submission outcome is accepted.

use chrono::{NaiveDate, Utc};
use mostrador_core::{
    Advisory, CatalogProduct, ChangeDue, ChangeDueCalculator, CoreResult, DiscountMode,
    LineCandidate, LotRecord, Money, Quantity, SaleDraft,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::submission::{
    SaleHeader, SaleRequest, SaleSubmitter, SubmissionError, SubmissionReceipt,
};

// =============================================================================
// Phase
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowPhase {
    Empty,
    ReadyToSubmit,
    Submitting,
    Submitted,
    Cancelled,
}

impl FlowPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowPhase::Submitted | FlowPhase::Cancelled)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Everything the screen can ask of the flow.
#[derive(Debug, Clone)]
pub enum Action {
    /// A product picked in the search, optionally from a specific lot and
    /// with an explicit starting quantity.
    AddProduct {
        product: CatalogProduct,
        lot: Option<LotRecord>,
        quantity: Option<Quantity>,
    },
    SetQuantity { index: usize, raw: String },
    SetBoxQuantities {
        index: usize,
        box_count: u32,
        loose_units: u32,
    },
    SetUnitPrice { index: usize, price: Money },
    SetDiscount { index: usize, discount: Money },
    SetExpiry {
        index: usize,
        expiry: Option<NaiveDate>,
    },
    RemoveLine { index: usize },
    SetDiscountMode(DiscountMode),
    SetTotalDiscount(Money),
    /// Raw "amount received" input.
    SetTendered(String),
    SubmitRequested(SaleHeader),
    SubmissionSucceeded(SubmissionReceipt),
    SubmissionFailed(SubmissionError),
    Cancel,
}

impl Action {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddProduct { .. } => "add_product",
            Action::SetQuantity { .. } => "set_quantity",
            Action::SetBoxQuantities { .. } => "set_box_quantities",
            Action::SetUnitPrice { .. } => "set_unit_price",
            Action::SetDiscount { .. } => "set_discount",
            Action::SetExpiry { .. } => "set_expiry",
            Action::RemoveLine { .. } => "remove_line",
            Action::SetDiscountMode(_) => "set_discount_mode",
            Action::SetTotalDiscount(_) => "set_total_discount",
            Action::SetTendered(_) => "set_tendered",
            Action::SubmitRequested(_) => "submit_requested",
            Action::SubmissionSucceeded(_) => "submission_succeeded",
            Action::SubmissionFailed(_) => "submission_failed",
            Action::Cancel => "cancel",
        }
    }

    fn edits_draft(&self) -> bool {
        !matches!(
            self,
            Action::SubmitRequested(_)
                | Action::SubmissionSucceeded(_)
                | Action::SubmissionFailed(_)
                | Action::Cancel
        )
    }
}

// =============================================================================
// State
// =============================================================================

/// Snapshot of the sale-creation screen.
///
/// `advisories` and `last_error` describe the most recent action only and
/// are reset by the next one.
#[derive(Debug, Clone)]
pub struct FlowState {
    pub phase: FlowPhase,
    pub draft: SaleDraft,
    pub tendered_input: String,
    pub change: ChangeDue,
    pub advisories: Vec<Advisory>,
    pub last_error: Option<ApiError>,
    /// Set while SUBMITTING.
    pub pending_request: Option<SaleRequest>,
    /// Set once SUBMITTED.
    pub receipt: Option<SubmissionReceipt>,
    lot_tracking: bool,
    default_discount_mode: DiscountMode,
    change_calculator: ChangeDueCalculator,
}

impl FlowState {
    /// A fresh, empty sale.
    pub fn new(config: &SessionConfig) -> Self {
        let draft = SaleDraft::new(config.lot_tracking, config.default_discount_mode);
        info!(
            draft_id = %draft.id(),
            created_at = %draft.created_at(),
            "Sale draft opened"
        );

        FlowState {
            phase: FlowPhase::Empty,
            draft,
            tendered_input: String::new(),
            change: ChangeDue::default(),
            advisories: Vec::new(),
            last_error: None,
            pending_request: None,
            receipt: None,
            lot_tracking: config.lot_tracking,
            default_discount_mode: config.default_discount_mode,
            change_calculator: ChangeDueCalculator::new(config.currency_decimals),
        }
    }

    pub fn tendered(&self) -> Money {
        self.change_calculator.parse_tendered(&self.tendered_input)
    }

    fn discard_draft(&mut self) {
        self.draft = SaleDraft::new(self.lot_tracking, self.default_discount_mode);
        self.tendered_input.clear();
        self.refresh();
    }

    /// Re-derives change and phase after the draft changed.
    fn refresh(&mut self) {
        let totals = self.draft.totals();
        self.change = self
            .change_calculator
            .calculate(totals.net_total, &self.tendered_input);

        if !self.phase.is_terminal() && self.phase != FlowPhase::Submitting {
            self.phase = if self.draft.is_empty() {
                FlowPhase::Empty
            } else {
                FlowPhase::ReadyToSubmit
            };
        }
    }

    fn record(&mut self, outcome: CoreResult<Option<Advisory>>) {
        match outcome {
            Ok(Some(advisory)) => self.advisories.push(advisory),
            Ok(None) => {}
            Err(err) => self.last_error = Some(err.into()),
        }
    }

    /// Builds the submission payload, or says why the sale cannot go yet.
    fn prepare_submission(&self, header: SaleHeader) -> Result<SaleRequest, ApiError> {
        if self.draft.is_empty() {
            return Err(ApiError::not_ready("Add at least one product to the sale"));
        }

        if let Some(line) = self.draft.items().iter().find(|l| l.is_pending_box_entry()) {
            return Err(ApiError::not_ready(format!(
                "Enter boxes or loose units for {}",
                line.product_name
            )));
        }

        if self.draft.discount_mode() == DiscountMode::TotalAmount
            && self.draft.manual_discount().is_negative()
        {
            return Err(ApiError::validation("Total discount cannot be negative"));
        }

        if let Some(err) = self.draft.totals().advisory().as_ref().and_then(ApiError::blocking) {
            return Err(err);
        }

        Ok(SaleRequest::from_draft(&self.draft, header, self.tendered()))
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies one action to the flow state.
///
/// Pure apart from logging: the same state and action always give the same
/// result.
pub fn reduce(mut state: FlowState, action: Action) -> FlowState {
    state.advisories.clear();
    state.last_error = None;

    if state.phase.is_terminal() {
        debug!(action = action.name(), phase = ?state.phase, "Action ignored in terminal phase");
        return state;
    }
    if state.phase == FlowPhase::Submitting && action.edits_draft() {
        debug!(action = action.name(), "Draft is frozen while submitting");
        return state;
    }

    debug!(action = action.name(), "Reducing");

    match action {
        Action::AddProduct {
            product,
            lot,
            quantity,
        } => {
            let candidate = match &lot {
                Some(lot) => LineCandidate::from_lot(&product, lot),
                None => LineCandidate::from_product(&product),
            };
            match candidate {
                Ok(candidate) => {
                    let candidate = match quantity {
                        Some(quantity) => candidate.with_quantity(quantity),
                        None => candidate,
                    };
                    let outcome = state.draft.add_or_merge(candidate);
                    state.record(outcome);
                }
                Err(err) => state.last_error = Some(ApiError::validation(err.to_string())),
            }
        }
        Action::SetQuantity { index, raw } => {
            let outcome = state.draft.set_quantity(index, &raw);
            state.record(outcome);
        }
        Action::SetBoxQuantities {
            index,
            box_count,
            loose_units,
        } => {
            let outcome = state.draft.set_box_quantities(index, box_count, loose_units);
            state.record(outcome);
        }
        Action::SetUnitPrice { index, price } => {
            let outcome = state.draft.set_unit_price(index, price).map(|_| None);
            state.record(outcome);
        }
        Action::SetDiscount { index, discount } => {
            let outcome = state.draft.set_discount(index, discount).map(|_| None);
            state.record(outcome);
        }
        Action::SetExpiry { index, expiry } => {
            let outcome = state.draft.set_expiry(index, expiry).map(|_| None);
            state.record(outcome);
        }
        Action::RemoveLine { index } => {
            let outcome = state.draft.remove(index).map(|_| None);
            state.record(outcome);
        }
        Action::SetDiscountMode(mode) => state.draft.set_discount_mode(mode),
        Action::SetTotalDiscount(amount) => {
            let outcome = state.draft.set_manual_discount(amount).map(|_| None);
            state.record(outcome);
        }
        Action::SetTendered(raw) => state.tendered_input = raw,
        Action::SubmitRequested(header) => {
            if state.phase == FlowPhase::Submitting {
                state.last_error = Some(ApiError::not_ready("Sale is already being submitted"));
            } else if state.phase != FlowPhase::ReadyToSubmit {
                state.last_error = Some(ApiError::not_ready("Add at least one product to the sale"));
            } else {
                match state.prepare_submission(header) {
                    Ok(request) => {
                        state.pending_request = Some(request);
                        state.phase = FlowPhase::Submitting;
                    }
                    Err(err) => state.last_error = Some(err),
                }
            }
        }
        Action::SubmissionSucceeded(receipt) => {
            if state.phase == FlowPhase::Submitting {
                state.pending_request = None;
                state.receipt = Some(receipt);
                state.phase = FlowPhase::Submitted;
                state.discard_draft();
            }
        }
        Action::SubmissionFailed(err) => {
            if state.phase == FlowPhase::Submitting {
                state.pending_request = None;
                state.phase = FlowPhase::ReadyToSubmit;
                state.last_error = Some(ApiError::from(&err));
                state.advisories.push(Advisory::SubmissionRejected {
                    reason: err.to_string(),
                });
            }
        }
        Action::Cancel => {
            if state.phase == FlowPhase::Submitting {
                state.last_error = Some(ApiError::not_ready(
                    "Sale is being submitted and cannot be cancelled",
                ));
            } else {
                state.phase = FlowPhase::Cancelled;
                state.discard_draft();
            }
        }
    }

    state.refresh();
    if let Some(advisory) = state.draft.totals().advisory() {
        state.advisories.push(advisory);
    }
    state
}

// =============================================================================
// Driver
// =============================================================================

/// Owns the flow state of one sale-creation screen.
pub struct SaleFlow {
    config: SessionConfig,
    state: FlowState,
}

impl SaleFlow {
    pub fn new(config: SessionConfig) -> Self {
        let state = FlowState::new(&config);
        SaleFlow { config, state }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Applies one action and returns the new state.
    pub fn dispatch(&mut self, action: Action) -> &FlowState {
        if let Action::AddProduct {
            product,
            lot: Some(lot),
            ..
        } = &action
        {
            if lot.is_expired(Utc::now().date_naive()) {
                warn!(
                    product_id = product.product_id,
                    lot_id = lot.lot_id,
                    expiry = ?lot.expiry,
                    "Adding a line from an expired lot"
                );
            }
        }

        self.state = reduce(self.state.clone(), action);

        for advisory in &self.state.advisories {
            warn!(%advisory, "Advisory");
        }
        if let Some(err) = &self.state.last_error {
            warn!(error = %err, "Action refused");
        }
        &self.state
    }

    /// Validates the draft and hands it to the submitter.
    ///
    /// On success the flow ends in SUBMITTED with the receipt. On failure it
    /// returns to READY_TO_SUBMIT with the draft untouched so the user can
    /// fix and resubmit.
    pub async fn submit<S>(
        &mut self,
        submitter: &S,
        header: SaleHeader,
    ) -> Result<SubmissionReceipt, ApiError>
    where
        S: SaleSubmitter + ?Sized,
    {
        self.dispatch(Action::SubmitRequested(header));

        if let Some(err) = &self.state.last_error {
            return Err(err.clone());
        }
        let request = match &self.state.pending_request {
            Some(request) => request.clone(),
            None => return Err(ApiError::not_ready("Sale is not ready to submit")),
        };

        info!(
            draft_id = %request.draft_id,
            items = request.items.len(),
            net_total = %request.totals.net_total,
            "Submitting sale"
        );

        match submitter.submit(&request).await {
            Ok(receipt) => {
                info!(
                    sale_id = receipt.sale_id,
                    invoice = ?receipt.invoice_number,
                    "Sale submitted"
                );
                self.dispatch(Action::SubmissionSucceeded(receipt.clone()));
                Ok(receipt)
            }
            Err(err) => {
                let api = ApiError::from(&err);
                self.dispatch(Action::SubmissionFailed(err));
                Err(api)
            }
        }
    }

    /// Leaves the screen without submitting.
    pub fn cancel(&mut self) {
        let draft_id = self.state.draft.id();
        if self.dispatch(Action::Cancel).phase == FlowPhase::Cancelled {
            info!(%draft_id, "Sale draft cancelled");
        }
    }

    /// Starts over with an empty draft, from any phase.
    pub fn start_new_sale(&mut self) {
        self.state = FlowState::new(&self.config);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::{ChangeKind, UnitOfMeasure};

    fn product(product_id: i64, price: i64) -> CatalogProduct {
        CatalogProduct {
            product_id,
            name: format!("Producto {}", product_id),
            unit_price: Money::from_minor(price),
            unit_of_measure: UnitOfMeasure::Unit,
            stock: Quantity::from_units(10),
            box_spec: None,
        }
    }

    fn add(product: CatalogProduct) -> Action {
        Action::AddProduct {
            product,
            lot: None,
            quantity: None,
        }
    }

    fn fresh() -> FlowState {
        FlowState::new(&SessionConfig::default())
    }

    #[test]
    fn test_phase_follows_line_count() {
        let state = fresh();
        assert_eq!(state.phase, FlowPhase::Empty);

        let state = reduce(state, add(product(1, 1000)));
        assert_eq!(state.phase, FlowPhase::ReadyToSubmit);

        let state = reduce(state, Action::RemoveLine { index: 0 });
        assert_eq!(state.phase, FlowPhase::Empty);
    }

    #[test]
    fn test_reduce_leaves_previous_state_untouched() {
        let before = reduce(fresh(), add(product(1, 1000)));
        let after = reduce(before.clone(), add(product(2, 500)));

        assert_eq!(before.draft.items().len(), 1);
        assert_eq!(after.draft.items().len(), 2);
    }

    #[test]
    fn test_change_tracks_totals_and_tendered() {
        let state = reduce(fresh(), add(product(1, 900)));
        let state = reduce(state, Action::SetTendered("1000".to_string()));
        assert_eq!(state.change.kind, ChangeKind::Change);
        assert_eq!(state.change.amount, Money::from_minor(100));

        let state = reduce(
            state,
            Action::SetQuantity {
                index: 0,
                raw: "2".to_string(),
            },
        );
        assert_eq!(state.change.kind, ChangeKind::Insufficient);
        assert_eq!(state.change.amount, Money::from_minor(800));
    }

    #[test]
    fn test_advisories_reset_per_action() {
        let state = reduce(fresh(), add(product(1, 1000)));
        let state = reduce(
            state,
            Action::SetQuantity {
                index: 0,
                raw: "50".to_string(),
            },
        );
        assert!(matches!(
            state.advisories.as_slice(),
            [Advisory::StockExceeded { .. }]
        ));

        let state = reduce(state, Action::SetTendered("5".to_string()));
        assert!(state.advisories.is_empty());
    }

    #[test]
    fn test_core_errors_become_api_errors() {
        let state = reduce(fresh(), Action::RemoveLine { index: 3 });
        let err = state.last_error.expect("stale index should be reported");
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
        assert_eq!(state.phase, FlowPhase::Empty);
    }

    #[test]
    fn test_negative_total_is_reported_and_blocks_submission() {
        let state = reduce(fresh(), add(product(1, 1000)));
        let state = reduce(state, Action::SetDiscountMode(DiscountMode::TotalAmount));
        let state = reduce(state, Action::SetTotalDiscount(Money::from_minor(1500)));
        assert!(matches!(
            state.advisories.as_slice(),
            [Advisory::NegativeNetTotal { .. }]
        ));
        assert_eq!(state.draft.totals().net_total, Money::from_minor(-500));

        let state = reduce(state, Action::SubmitRequested(SaleHeader::default()));
        assert_eq!(state.phase, FlowPhase::ReadyToSubmit);
        assert_eq!(
            state.last_error.map(|e| e.code),
            Some(crate::error::ErrorCode::NegativeNetTotal)
        );
    }

    #[test]
    fn test_submit_from_empty_is_refused() {
        let state = reduce(fresh(), Action::SubmitRequested(SaleHeader::default()));
        assert_eq!(state.phase, FlowPhase::Empty);
        assert!(state.last_error.is_some());
        assert!(state.pending_request.is_none());
    }

    #[test]
    fn test_draft_frozen_while_submitting() {
        let state = reduce(fresh(), add(product(1, 1000)));
        let state = reduce(state, Action::SubmitRequested(SaleHeader::default()));
        assert_eq!(state.phase, FlowPhase::Submitting);

        let state = reduce(state, add(product(2, 500)));
        assert_eq!(state.draft.items().len(), 1);
        assert_eq!(state.phase, FlowPhase::Submitting);
    }

    #[test]
    fn test_rejection_keeps_draft() {
        let state = reduce(fresh(), add(product(1, 1000)));
        let state = reduce(state, Action::SubmitRequested(SaleHeader::default()));
        let state = reduce(
            state,
            Action::SubmissionFailed(SubmissionError::Rejected {
                reason: "Stock changed".to_string(),
            }),
        );

        assert_eq!(state.phase, FlowPhase::ReadyToSubmit);
        assert_eq!(state.draft.items().len(), 1);
        assert!(state.pending_request.is_none());
        assert_eq!(
            state.advisories,
            vec![Advisory::SubmissionRejected {
                reason: "Stock changed".to_string()
            }]
        );
    }

    #[test]
    fn test_terminal_phases_ignore_actions() {
        let state = reduce(fresh(), add(product(1, 1000)));
        let state = reduce(state, Action::Cancel);
        assert_eq!(state.phase, FlowPhase::Cancelled);
        assert!(state.draft.is_empty());

        let state = reduce(state, add(product(2, 500)));
        assert_eq!(state.phase, FlowPhase::Cancelled);
        assert!(state.draft.is_empty());
    }

    #[test]
    fn test_terminal_phase_clears_stale_feedback() {
        let state = reduce(fresh(), add(product(1, 1000)));
        let state = reduce(state, Action::Cancel);
        let mut stale = state.clone();
        stale.last_error = Some(ApiError::not_ready("stale"));
        stale.advisories.push(Advisory::SubmissionRejected {
            reason: "stale".to_string(),
        });

        let state = reduce(stale, add(product(2, 500)));
        assert_eq!(state.phase, FlowPhase::Cancelled);
        assert!(state.last_error.is_none());
        assert!(state.advisories.is_empty());
    }

    #[test]
    fn test_cancel_refused_while_submitting() {
        let state = reduce(fresh(), add(product(1, 1000)));
        let state = reduce(state, Action::SubmitRequested(SaleHeader::default()));
        let draft_id = state.draft.id();

        let state = reduce(state, Action::Cancel);
        assert_eq!(state.phase, FlowPhase::Submitting);
        assert_eq!(state.draft.id(), draft_id);
        assert_eq!(state.draft.items().len(), 1);
        assert_eq!(
            state.last_error.as_ref().map(|e| e.code),
            Some(crate::error::ErrorCode::NotReady)
        );

        let receipt = SubmissionReceipt {
            sale_id: 3,
            invoice_number: None,
        };
        let state = reduce(state, Action::SubmissionSucceeded(receipt.clone()));
        assert_eq!(state.phase, FlowPhase::Submitted);
        assert_eq!(state.receipt, Some(receipt));
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_invalid_catalog_payload_is_refused() {
        let mut bad = product(1, 1000);
        bad.unit_of_measure = UnitOfMeasure::Box;

        let state = reduce(fresh(), add(bad));
        assert!(state.draft.is_empty());
        assert_eq!(
            state.last_error.map(|e| e.code),
            Some(crate::error::ErrorCode::ValidationError)
        );
    }
}
