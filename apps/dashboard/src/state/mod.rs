//! # Application State Module
//!
//! State for the dashboard, one focused type per page.
//!
//! ## State Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           AppState                                      │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │ AuthState    │  │ CartState    │  │ SettingsState│                  │
//! │  │ logged-in    │  │ Arc<Mutex<   │  │ Arc<tokio::  │                  │
//! │  │ flag         │  │   Cart>>     │  │  Mutex<..>>  │                  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘                  │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐ │
//! │  │InventoryState│  │ Transaction  │  │ EmployeeState│  │Notification│ │
//! │  │ StockLedger  │  │ State        │  │ Roster       │  │ State      │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘ │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐                                     │
//! │  │ ProductState │  │ QueueState   │                                     │
//! │  │ Catalog      │  │ OrderQueue   │                                     │
//! │  └──────────────┘  └──────────────┘                                     │
//! │                                                                         │
//! │  config: AppConfig (read-only)     printer: Arc<dyn ReceiptPrinter>     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes `&AppState` and touches only the parts it needs.
//! Synchronous locks are released before any `.await`.

mod auth;
mod cart;
mod employees;
mod inventory;
mod notifications;
mod products;
mod queue;
mod settings;
mod transactions;

pub use auth::AuthState;
pub use cart::CartState;
pub use employees::EmployeeState;
pub use inventory::InventoryState;
pub use notifications::NotificationState;
pub use products::ProductState;
pub use queue::QueueState;
pub use settings::SettingsState;
pub use transactions::{SalesBook, TransactionState};

use std::sync::Arc;

use melatea_core::inventory::LedgerPolicy;
use melatea_core::settings::Settings;

use crate::config::AppConfig;
use crate::printer::{LogPrinter, ReceiptPrinter};

/// Everything the dashboard keeps in memory.
pub struct AppState {
    pub config: AppConfig,
    pub auth: AuthState,
    pub products: ProductState,
    pub settings: SettingsState,
    pub cart: CartState,
    pub inventory: InventoryState,
    pub transactions: TransactionState,
    pub employees: EmployeeState,
    pub notifications: NotificationState,
    pub queue: QueueState,
    printer: Arc<dyn ReceiptPrinter>,
}

impl AppState {
    /// Empty state with settings taken from `config`.
    pub fn new(config: AppConfig) -> Self {
        let settings = Settings {
            general: config.general_settings(),
            ..Settings::default()
        };
        let policy = LedgerPolicy {
            allow_negative_stock: config.allow_negative_stock,
        };

        AppState {
            auth: AuthState::new(),
            products: ProductState::new(),
            settings: SettingsState::new(settings),
            cart: CartState::new(),
            inventory: InventoryState::new(policy),
            transactions: TransactionState::new(),
            employees: EmployeeState::new(),
            notifications: NotificationState::new(),
            queue: QueueState::new(),
            printer: Arc::new(LogPrinter),
            config,
        }
    }

    /// Replaces the receipt printer.
    pub fn with_printer(mut self, printer: Arc<dyn ReceiptPrinter>) -> Self {
        self.printer = printer;
        self
    }

    pub fn printer(&self) -> &dyn ReceiptPrinter {
        self.printer.as_ref()
    }
}
