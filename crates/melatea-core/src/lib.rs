//! # melatea-core: Pure Business Logic for MelaTea POS
//!
//! This crate is the **heart** of MelaTea POS. It contains all business logic
//! as pure functions and plain data structures with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MelaTea POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (apps/dashboard)                   │   │
//! │  │   AppState ──► commands (cart, payment, inventory, settings)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ melatea-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   cart    │  │  payment  │  │ settings  │  │   │
//! │  │   │  Ledger   │  │   Cart    │  │   Flow    │  │  Store    │  │   │
//! │  │   │  Status   │  │ CartItem  │  │  Outcome  │  │ Sections  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  receipt  │  │  export   │  │   query   │  │ employees │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │ products  │  │   queue   │  │ analytics │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Menu products, payment methods
//! - [`products`] - Product catalog with categories and availability
//! - [`queue`] - Kitchen order queue fed by completed sales
//! - [`analytics`] - Dashboard overview figures
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`inventory`] - Materials, stock movements and the stock ledger
//! - [`query`] - Filtering, sorting and pagination over ledger data
//! - [`export`] - CSV export of stock history
//! - [`cart`] - The in-progress order
//! - [`payment`] - Payment outcome and the payment flow state machine
//! - [`receipt`] - Receipt model, HTML rendering, invoice numbers
//! - [`settings`] - Store settings and section/field updates
//! - [`transactions`] - Completed sale snapshots
//! - [`employees`] - Employee roster
//! - [`notifications`] - Notification center and low-stock alerts
//!
//! ## Example Usage
//!
//! ```rust
//! use melatea_core::cart::Cart;
//! use melatea_core::money::Money;
//! use melatea_core::payment::{pay, PaymentOutcome};
//! use melatea_core::types::{PaymentMethod, Product};
//!
//! let classic = Product::new("1", "Classic Tea", Money::from_minor(20_000));
//! let thai = Product::new("2", "Thai Milk Tea", Money::from_minor(29_000));
//!
//! let mut cart = Cart::new();
//! cart.add_item(&classic).unwrap();
//! cart.add_item(&thai).unwrap();
//! cart.add_item(&thai).unwrap();
//! assert_eq!(cart.total(), Money::from_minor(78_000));
//!
//! let outcome = pay(cart.total(), PaymentMethod::Cash, Money::from_minor(80_000));
//! assert_eq!(outcome, PaymentOutcome::Completed { change: Money::from_minor(2_000) });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod cart;
pub mod employees;
pub mod error;
pub mod export;
pub mod inventory;
pub mod money;
pub mod notifications;
pub mod payment;
pub mod products;
pub mod query;
pub mod queue;
pub mod receipt;
pub mod settings;
pub mod transactions;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use melatea_core::Money` instead of
// `use melatea_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct items allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps receipts printable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Reorder threshold applied to materials registered without one.
pub const DEFAULT_REORDER_THRESHOLD: i64 = 10;

/// Employee recorded on movements that were not made by a person.
pub const SYSTEM_EMPLOYEE: &str = "System";
