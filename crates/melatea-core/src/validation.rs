//! # Validation Module
//!
//! Field checks shared by the login form, the employee form, the payment
//! keypad and the stock forms. Each check returns the cleaned value or the
//! [`ValidationError`] the form shows next to the field.
//!
//! ```text
//! login ─────────► validate_required(username), validate_password
//! employee form ─► validate_name, validate_email, validate_password
//! payment keypad ► parse_amount_entry
//! receive/consume► validate_stock_quantity
//! threshold ─────► validate_threshold
//! ```
//!
//! ```rust
//! use melatea_core::validation::{parse_amount_entry, validate_email};
//!
//! assert!(validate_email("sarah.m@melatea.com").is_ok());
//! assert!(parse_amount_entry("12a").is_err());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_CART_ITEMS;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted by the login and employee forms.
pub const MIN_PASSWORD_LENGTH: usize = 4;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a field is present after trimming and returns the trimmed value.
///
/// ## Example
/// ```rust
/// use melatea_core::validation::validate_required;
///
/// assert_eq!(validate_required("name", "  Sarah  ").unwrap(), "Sarah");
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates a display name (employee, material, store).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = validate_required(field, name)?;

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(name)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must look like `local@domain.tld` with no whitespace
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = validate_required("email", email)?;

    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(email)
}

/// Validates a password for login or a new employee.
///
/// ## Rules
/// - Must not be blank
/// - Must be at least [`MIN_PASSWORD_LENGTH`] characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock movement quantity.
///
/// ## Rules
/// - Must be strictly positive; the sign of a movement comes from its kind
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Inventory: Receive Stock                                              │
/// │                                                                         │
/// │  User enters quantity: 12.5 (kg)                                       │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_stock_quantity(12.5) ← THIS FUNCTION                         │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       └── OK → Ledger appends a receive movement                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_stock_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a reorder threshold.
///
/// ## Rules
/// - Must be non-negative (0 means "only warn when out of stock")
pub fn validate_threshold(threshold: Decimal) -> ValidationResult<()> {
    if threshold < Decimal::ZERO {
        return Err(ValidationError::OutOfRange {
            field: "reorder threshold".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Parses the amount typed on the payment screen.
///
/// ## Rules
/// - Only ASCII digits are accepted (the keypad never produces anything else)
/// - Empty input means nothing has been entered yet and is rejected
///
/// ## Example
/// ```rust
/// use melatea_core::validation::parse_amount_entry;
///
/// assert_eq!(parse_amount_entry("80000").unwrap().minor(), 80_000);
/// assert!(parse_amount_entry("80.000,50").is_err());
/// assert!(parse_amount_entry("").is_err());
/// ```
pub fn parse_amount_entry(input: &str) -> ValidationResult<Money> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "amount paid".to_string(),
        });
    }

    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "amount paid".to_string(),
            reason: "must contain digits only".to_string(),
        });
    }

    input
        .parse::<i64>()
        .map(Money::from_minor)
        .map_err(|_| ValidationError::OutOfRange {
            field: "amount paid".to_string(),
            min: 0,
            max: i64::MAX,
        })
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Checks there is room for one more distinct item in the cart.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
