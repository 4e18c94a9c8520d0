//! # Error Types
//!
//! What can go wrong inside the shop's business rules.
//!
//! ```text
//! form input ──► ValidationError ──┐
//!                                  ├──► CoreError ──► ApiError (dashboard)
//! ledger / cart / payment rule ────┘
//! ```
//!
//! Messages are written for the cashier: they name the material, item or
//! amount involved.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// A shop rule said no.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("Item {0} not in cart")]
    ItemNotInCart(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Marked out of stock on the products page.
    #[error("{0} is out of stock")]
    ProductUnavailable(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Queue status change the kitchen flow does not allow, e.g. serving a
    /// pending order.
    #[error("Order {order} is {from}, cannot move to {to}")]
    InvalidOrderTransition {
        order: String,
        from: String,
        to: String,
    },

    /// Consuming more than is on hand while the ledger forbids negative stock.
    ///
    /// ```text
    /// consume Matcha Powder 10 kg, on hand 8 kg
    ///      └──► InsufficientStock { material: "Matcha Powder", available: "8", requested: "10" }
    /// ```
    #[error("Not enough {material} in stock: {available} on hand, {requested} needed")]
    InsufficientStock {
        material: String,
        available: String,
        requested: String,
    },

    #[error("Insufficient payment: total {total}, paid {paid}")]
    InsufficientFunds { total: Money, paid: Money },

    /// A payment step was attempted from the wrong stage, e.g. cancelling
    /// while processing or completing a payment that never started.
    #[error("Payment is {current}, cannot {action}")]
    InvalidPaymentState { current: String, action: String },

    /// Method switched off on the settings page.
    #[error("Payment method {0} is disabled")]
    PaymentMethodDisabled(String),

    #[error("The order already has {max} different items")]
    CartTooLarge { max: usize },

    #[error("At most {max} of one item per order, got {requested}")]
    QuantityTooLarge { requested: i64, max: i64 },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Receipt rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("CSV export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A form field the cashier has to fix.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} needs at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} allows at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be from {min} to {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Stock quantities.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Malformed email, non-digit amount, wrongly typed setting.
    #[error("{field}: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Unknown settings field or enum value.
    #[error("{field} must be one of {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Taken email or material id.
    #[error("{field} {value} is already in use")]
    Duplicate { field: String, value: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            material: "Matcha Powder".to_string(),
            available: "8".to_string(),
            requested: "10".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Not enough Matcha Powder in stock: 8 on hand, 10 needed"
        );

        let err = CoreError::InsufficientFunds {
            total: Money::from_minor(78_000),
            paid: Money::from_minor(50_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: total Rp 78.000, paid Rp 50.000"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 4,
        };
        assert_eq!(err.to_string(), "password needs at least 4 characters");

        let err = ValidationError::NotAllowed {
            field: "printer type".to_string(),
            allowed: vec!["usb".to_string(), "network".to_string()],
        };
        assert_eq!(err.to_string(), "printer type must be one of usb, network");
    }

    #[test]
    fn test_validation_passes_through_core_error() {
        let err: CoreError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.to_string(), "quantity must be greater than zero");
    }
}
