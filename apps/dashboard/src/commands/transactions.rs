//! # Transaction Commands
//!
//! The sales history page. Read-only: sales are recorded by
//! `complete_payment`.

use melatea_core::query::{paginate, Page};
use melatea_core::transactions::{revenue, Transaction, TransactionFilter, TRANSACTIONS_PAGE_SIZE};
use melatea_core::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    /// Revenue of every matching paid transaction.
    pub revenue: Money,
    pub transactions: Page<Transaction>,
}

/// Filtered transactions, newest first, one page at a time.
pub fn list_transactions(
    state: &AppState,
    filter: &TransactionFilter,
    page: usize,
) -> Result<TransactionsPage, ApiError> {
    state.auth.require_login()?;
    debug!(search = %filter.search, page, "list_transactions command");

    let found = state.transactions.with_book(|b| b.log.filter(filter));
    Ok(TransactionsPage {
        revenue: revenue(&found),
        transactions: paginate(found, page, TRANSACTIONS_PAGE_SIZE),
    })
}

/// Transaction detail modal.
pub fn get_transaction(state: &AppState, invoice_number: &str) -> Result<Transaction, ApiError> {
    state.auth.require_login()?;
    debug!(invoice = %invoice_number, "get_transaction command");

    state
        .transactions
        .with_book(|b| b.log.find_by_invoice(invoice_number).cloned())
        .ok_or_else(|| ApiError::not_found("Transaction", invoice_number))
}
