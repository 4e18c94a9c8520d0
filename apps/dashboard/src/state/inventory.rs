//! # Inventory State
//!
//! The stock ledger: materials plus the append-only movement history.

use std::sync::{Arc, Mutex, PoisonError};

use melatea_core::inventory::{LedgerPolicy, StockLedger};

#[derive(Debug, Default)]
pub struct InventoryState {
    ledger: Arc<Mutex<StockLedger>>,
}

impl InventoryState {
    pub fn new(policy: LedgerPolicy) -> Self {
        InventoryState {
            ledger: Arc::new(Mutex::new(StockLedger::with_policy(policy))),
        }
    }

    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StockLedger) -> R,
    {
        let ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&ledger)
    }

    pub fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut StockLedger) -> R,
    {
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut ledger)
    }
}
