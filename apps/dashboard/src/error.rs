//! # API Error Type
//!
//! Unified error type for dashboard commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   melatea-core                      dashboard commands                  │
//! │   ────────────                      ──────────────────                  │
//! │   CoreError ──────────┐                                                 │
//! │   ValidationError ────┼──► From ──► ApiError { code, message } ──► UI   │
//! │   ConfigError ────────┘                                                 │
//! │                                                                         │
//! │   Commands use `?` everywhere; the conversion picks the code.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use melatea_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::config::ConfigError;

/// Failure payload of every command.
///
/// ```json
/// { "code": "INSUFFICIENT_FUNDS", "message": "Insufficient payment: total Rp 78.000, paid Rp 50.000" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    /// Shown to the cashier as-is.
    pub message: String,
}

/// What the frontend switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    /// Login guard rejected the command.
    Unauthorized,
    /// Payment step taken out of order.
    BusinessLogic,
    Internal,
    CartError,
    InsufficientStock,
    /// Keeps the payment modal open with the cart untouched.
    InsufficientFunds,
    /// Method disabled in settings.
    PaymentError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// `"<resource> not found: <id>"`
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Please log in first")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::MaterialNotFound(_)
            | CoreError::EmployeeNotFound(_)
            | CoreError::ProductNotFound(_)
            | CoreError::OrderNotFound(_) => ErrorCode::NotFound,
            CoreError::ItemNotInCart(_)
            | CoreError::CartTooLarge { .. }
            | CoreError::EmptyCart
            | CoreError::ProductUnavailable(_) => ErrorCode::CartError,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            CoreError::InvalidPaymentState { .. } | CoreError::InvalidOrderTransition { .. } => {
                ErrorCode::BusinessLogic
            }
            CoreError::PaymentMethodDisabled(_) => ErrorCode::PaymentError,
            CoreError::QuantityTooLarge { .. } | CoreError::Validation(_) => {
                ErrorCode::ValidationError
            }
            CoreError::Render(e) => {
                tracing::error!(error = %e, "Receipt rendering failed");
                return ApiError::internal("Receipt could not be rendered");
            }
            CoreError::Export(e) => {
                tracing::error!(error = %e, "CSV export failed");
                return ApiError::internal("Export failed");
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!(error = %err, "Configuration error");
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
