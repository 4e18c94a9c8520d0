//! # Transaction State
//!
//! Completed sales and the invoice counter. Both live behind one lock so
//! an invoice number and its transaction are recorded together.

use std::sync::{Arc, Mutex, PoisonError};

use melatea_core::receipt::InvoiceSequence;
use melatea_core::transactions::TransactionLog;

/// Sales history plus the next invoice number.
#[derive(Debug, Default)]
pub struct SalesBook {
    pub log: TransactionLog,
    pub invoices: InvoiceSequence,
}

#[derive(Debug, Default)]
pub struct TransactionState {
    book: Arc<Mutex<SalesBook>>,
}

impl TransactionState {
    pub fn new() -> Self {
        TransactionState::default()
    }

    pub fn with_book<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SalesBook) -> R,
    {
        let book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        f(&book)
    }

    pub fn with_book_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SalesBook) -> R,
    {
        let mut book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut book)
    }
}
