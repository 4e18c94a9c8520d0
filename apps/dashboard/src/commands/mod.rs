//! # Commands Module
//!
//! Everything the dashboard frontend can ask the backend to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (exports)
//! ├── auth.rs           ◄─── Login / logout
//! ├── overview.rs       ◄─── Dashboard home: today vs yesterday, panels
//! ├── products.rs       ◄─── Products page (catalog CRUD)
//! ├── cart.rs           ◄─── Order panel
//! ├── payment.rs        ◄─── Payment modal, receipt printing
//! ├── queue.rs          ◄─── Order queue (kitchen board)
//! ├── inventory.rs      ◄─── Materials, stock history, CSV export
//! ├── settings.rs       ◄─── Settings page, receipt preview
//! ├── transactions.rs   ◄─── Sales history
//! ├── employees.rs      ◄─── Staff roster
//! └── notifications.rs  ◄─── Header bell
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  invoke('receive_stock', { materialId: '2', quantity: '50', ... })      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  async fn receive_stock(                                                │
//! │      state: &AppState,        ◄── Shared in-memory state               │
//! │      request: ReceiveStock,   ◄── From invoke params                   │
//! │  ) -> Result<StockMovement, ApiError>                                   │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Frontend receives: StockMovement  or  { code, message }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command except login/logout sits behind the login guard.

pub mod auth;
pub mod cart;
pub mod employees;
pub mod inventory;
pub mod notifications;
pub mod overview;
pub mod payment;
pub mod products;
pub mod queue;
pub mod settings;
pub mod transactions;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::AppConfig;
    use crate::seed;
    use crate::state::AppState;

    /// Seeded state with no delays and an open session.
    pub async fn logged_in_state() -> AppState {
        let state = AppState::new(AppConfig::without_delays());
        seed::seed(&state).await.unwrap();
        state.auth.sign_in("airlangga@melatea.com");
        state
    }
}
