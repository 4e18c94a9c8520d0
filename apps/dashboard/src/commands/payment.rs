//! # Payment Commands
//!
//! The payment modal: pick a method, enter an amount, pay.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  complete_payment(method, amount)                                       │
//! │       │                                                                 │
//! │       ├── not logged in / cart empty ──────────────► error             │
//! │       ├── method disabled in settings ─────────────► PAYMENT_ERROR     │
//! │       ├── amount < total ──────────────────────────► INSUFFICIENT_FUNDS│
//! │       │                                              (cart untouched)   │
//! │       ▼                                                                 │
//! │  processing (simulated delay)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invoice number ──► Transaction recorded ──► receipt rendered           │
//! │       │                                                                 │
//! │       ├── order queued as pending on the kitchen board                  │
//! │       ├── printer enabled && auto print ──► ReceiptPrinter::print       │
//! │       ▼                                                                 │
//! │  paid lines taken out of the cart (items added meanwhile stay)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use melatea_core::payment::{available_methods, pay, PaymentFlow, PaymentOutcome, QUICK_AMOUNTS};
use melatea_core::receipt::{Receipt, DEFAULT_CASHIER};
use melatea_core::transactions::Transaction;
use melatea_core::validation::parse_amount_entry;
use melatea_core::{CoreError, Money, PaymentMethod};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// What the payment modal shows before the cashier pays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOptions {
    pub total: Money,
    pub methods: Vec<PaymentMethod>,
    pub quick_amounts: Vec<Money>,
    pub qr_code_url: String,
    pub instructions: String,
}

/// Payment request from the modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    /// Keypad text, digits only.
    pub amount: String,
    /// Defaults to walk-in.
    #[serde(default)]
    pub customer: Option<String>,
}

/// A finished sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCompleted {
    pub transaction: Transaction,
    pub receipt: Receipt,
    pub receipt_html: String,
    /// True when the receipt went to the printer automatically.
    pub printed: bool,
}

/// Methods enabled in settings, quick amounts and the cart total.
pub async fn payment_options(state: &AppState) -> Result<PaymentOptions, ApiError> {
    state.auth.require_login()?;
    debug!("payment_options command");

    let methods = state.settings.snapshot().await.payment_methods;
    Ok(PaymentOptions {
        total: state.cart.with_cart(|c| c.total()),
        methods: available_methods(&methods),
        quick_amounts: QUICK_AMOUNTS.to_vec(),
        qr_code_url: methods.qr_code_url,
        instructions: methods.instructions,
    })
}

/// Live change calculation while the cashier types. Changes nothing.
pub fn preview_payment(
    state: &AppState,
    method: PaymentMethod,
    amount: &str,
) -> Result<PaymentOutcome, ApiError> {
    state.auth.require_login()?;

    let paid = parse_amount_entry(amount)?;
    let total = state.cart.with_cart(|c| c.total());
    Ok(pay(total, method, paid))
}

/// Pays for the current cart.
///
/// ## Errors
/// - `UNAUTHORIZED` without a session
/// - `CART_ERROR` when the cart is empty
/// - `PAYMENT_ERROR` when the method is disabled
/// - `INSUFFICIENT_FUNDS` when the amount is below the total
/// - `VALIDATION_ERROR` for a malformed amount
///
/// On any error the cart is left as it was.
pub async fn complete_payment(
    state: &AppState,
    request: PaymentRequest,
) -> Result<SaleCompleted, ApiError> {
    state.auth.require_login()?;
    debug!(
        method = %request.method.as_str(),
        amount = %request.amount,
        "complete_payment command"
    );

    let cart = state.cart.with_cart(|c| c.clone());
    if cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }
    let settings = state.settings.snapshot().await;

    let mut flow = PaymentFlow::new(cart.total());
    flow.select_method(request.method, &settings.payment_methods)?;
    flow.enter_amount(&request.amount)?;
    if let Err(e) = flow.begin() {
        warn!(error = %e, total = %cart.total(), "Payment rejected");
        return Err(e.into());
    }

    tokio::time::sleep(state.config.payment_delay).await;
    let payment = flow.complete()?;

    let now = Utc::now();
    let invoice_number = state
        .transactions
        .with_book_mut(|book| book.invoices.next(now.date_naive()));
    let transaction = Transaction::from_sale(
        invoice_number.clone(),
        request.customer,
        DEFAULT_CASHIER,
        now,
        &cart,
        &payment,
    );
    let receipt = Receipt::for_sale(
        &settings.general,
        invoice_number.clone(),
        now,
        DEFAULT_CASHIER,
        &cart,
        &payment,
    );
    let receipt_html = receipt.render_html()?;

    state
        .transactions
        .with_book_mut(|book| book.log.record(transaction.clone()));
    let queued = state.queue.with_queue_mut(|q| q.enqueue_sale(&transaction));
    state.cart.with_cart_mut(|c| c.settle(&cart));

    let printed = settings.printer.prints_automatically();
    if printed {
        state.printer().print(&receipt_html);
    }

    info!(
        invoice = %invoice_number,
        total = %payment.total,
        change = %payment.change,
        method = %payment.method.as_str(),
        order = %queued.order_number,
        printed,
        "Payment completed"
    );

    Ok(SaleCompleted {
        transaction,
        receipt,
        receipt_html,
        printed,
    })
}
