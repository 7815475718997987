//! # Session Errors
//!
//! Two layers live here:
//!
//! - [`SessionError`]: failures of the session plumbing itself (config
//!   loading). Returned from Rust APIs.
//! - [`ApiError`]: what the sale-creation screen receives when an action or
//!   a submission fails. Serialized with a machine-readable `code`.
//!
//! ```text
//! ValidationError ─► CoreError ─┐
//!                               ├─► ApiError { code, message } ─► UI
//! SubmissionError ──────────────┘
//! ```

use mostrador_core::{Advisory, CoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::submission::SubmissionError;

// =============================================================================
// Session Error
// =============================================================================

/// Errors from loading session settings.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// API Error
// =============================================================================

/// Error shown to the user by the sale-creation screen.
///
/// ```json
/// {
///   "code": "SUBMISSION_REJECTED",
///   "message": "Customer has exceeded the credit limit"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for the sale-creation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Stale line index
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Draft operation refused (capacity, derived quantity)
    DraftError,

    /// Sale cannot be submitted in its current state
    NotReady,

    /// Discounts exceed the subtotal
    NegativeNetTotal,

    /// The backend refused the sale
    SubmissionRejected,

    /// The backend could not be reached
    SubmissionFailed,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotReady, message)
    }

    /// The error an advisory raises at submission time, if it blocks.
    pub fn blocking(advisory: &Advisory) -> Option<Self> {
        match advisory {
            Advisory::NegativeNetTotal { .. } => Some(ApiError::new(
                ErrorCode::NegativeNetTotal,
                advisory.to_string(),
            )),
            _ => None,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::DraftTooLarge { .. }
            | CoreError::QuantityIsDerived { .. }
            | CoreError::NotABoxLine { .. } => ApiError::new(ErrorCode::DraftError, err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<&SubmissionError> for ApiError {
    fn from(err: &SubmissionError) -> Self {
        match err {
            SubmissionError::Rejected { reason } => {
                ApiError::new(ErrorCode::SubmissionRejected, reason.clone())
            }
            SubmissionError::Transport(_) => {
                ApiError::new(ErrorCode::SubmissionFailed, err.to_string())
            }
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        ApiError::from(&err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::{Money, ValidationError};

    #[test]
    fn test_core_error_codes() {
        let api: ApiError = CoreError::LineNotFound { index: 4 }.into();
        assert_eq!(api.code, ErrorCode::NotFound);
        assert_eq!(api.message, "No line item at position 4");

        let api: ApiError = CoreError::QuantityIsDerived { index: 0 }.into();
        assert_eq!(api.code, ErrorCode::DraftError);

        let api: ApiError = CoreError::Validation(ValidationError::MustBeNonNegative {
            field: "unit price".to_string(),
        })
        .into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.message, "unit price cannot be negative");
    }

    #[test]
    fn test_submission_errors_surface_verbatim() {
        let api: ApiError = SubmissionError::Rejected {
            reason: "Lot 7 is exhausted".to_string(),
        }
        .into();
        assert_eq!(api.code, ErrorCode::SubmissionRejected);
        assert_eq!(api.message, "Lot 7 is exhausted");

        let api: ApiError = SubmissionError::Transport("connection reset".to_string()).into();
        assert_eq!(api.code, ErrorCode::SubmissionFailed);
        assert!(api.message.contains("connection reset"));
    }

    #[test]
    fn test_only_negative_total_advisory_blocks() {
        let blocking = Advisory::NegativeNetTotal {
            net_total: Money::from_minor(-100),
        };
        let api = ApiError::blocking(&blocking);
        assert_eq!(api.map(|e| e.code), Some(ErrorCode::NegativeNetTotal));

        let informational = Advisory::SubmissionRejected {
            reason: "x".to_string(),
        };
        assert!(ApiError::blocking(&informational).is_none());
    }

    #[test]
    fn test_serialization() {
        let api = ApiError::not_ready("Add at least one product");
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "NOT_READY");
        assert_eq!(json["message"], "Add at least one product");
    }
}
