//! # mostrador-session
//!
//! Runs one sale-creation screen on top of `mostrador-core`.
//!
//! ## Module Organization
//! ```text
//! mostrador_session/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── flow.rs         ◄─── FlowState, Action, reduce(), SaleFlow
//! ├── submission.rs   ◄─── SaleRequest, SaleSubmitter, receipts
//! ├── config.rs       ◄─── SessionConfig (defaults → TOML → env)
//! └── error.rs        ◄─── ApiError for the UI, SessionError
//! ```
//!
//! ## Typical Use
//! ```text
//! init_tracing();
//! let config = SessionConfig::load()?;
//! let mut flow = SaleFlow::new(config);
//!
//! flow.dispatch(Action::AddProduct { product, lot: None, quantity: None });
//! flow.dispatch(Action::SetTendered("50000".into()));
//! let receipt = flow.submit(&http_submitter, header).await?;
//! ```

use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod flow;
pub mod submission;

pub use config::{config_file_path, SessionConfig};
pub use error::{ApiError, ErrorCode, SessionError, SessionResult};
pub use flow::{reduce, Action, FlowPhase, FlowState, SaleFlow};
pub use submission::{
    DiscountRequest, PaymentMethod, SaleHeader, SaleRequest, SaleRequestItem, SaleSubmitter,
    SubmissionError, SubmissionReceipt,
};

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mostrador=trace` - Show trace for mostrador crates only
/// - Default: INFO, DEBUG for mostrador crates
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
