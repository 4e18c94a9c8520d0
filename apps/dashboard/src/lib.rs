//! # MelaTea Dashboard Library
//!
//! Application layer of the MelaTea POS dashboard: configuration, in-memory
//! state, and the commands the frontend invokes.
//!
//! ## Module Organization
//! ```text
//! melatea_dashboard/
//! ├── lib.rs          ◄─── You are here (logging & startup)
//! ├── config.rs       ◄─── Environment configuration
//! ├── error.rs        ◄─── API error type for commands
//! ├── printer.rs      ◄─── Receipt printer seam
//! ├── seed.rs         ◄─── Demo products, stock, staff, sales, queue
//! ├── state/          ◄─── One focused state type per page
//! └── commands/       ◄─── auth, overview, products, cart, payment, queue,
//!                          inventory, settings, transactions, employees,
//!                          notifications
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod printer;
pub mod seed;
pub mod state;

use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::ApiError;
use melatea_core::notifications::low_stock_alerts;
use state::AppState;

/// Builds and seeds the dashboard state.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load AppConfig from MELATEA_* environment variables                 │
/// │  2. Build AppState (settings, empty catalog/ledger/roster/log/queue)    │
/// │  3. Seed demo data (stock replayed through the ledger)                  │
/// │  4. Report stock status and pending low-stock alerts                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn start() -> Result<AppState, ApiError> {
    start_with(AppConfig::from_env()?).await
}

/// Startup steps 2-4 with an already loaded configuration.
pub async fn start_with(config: AppConfig) -> Result<AppState, ApiError> {
    info!(store = %config.store_name, "Starting MelaTea POS dashboard");

    let state = AppState::new(config);
    seed::seed(&state).await?;

    let settings = state.settings.snapshot().await.notifications;
    let (summary, alerts) = state.inventory.with_ledger(|l| {
        let snapshot = l.snapshot();
        (l.summary(), low_stock_alerts(&snapshot, &settings, chrono::Utc::now()))
    });
    info!(
        total = summary.total,
        low_stock = summary.low_stock,
        out_of_stock = summary.out_of_stock,
        "Inventory loaded"
    );
    for alert in &alerts {
        warn!(alert = %alert.message, "Low stock");
    }

    Ok(state)
}

/// Initializes logging, then starts the dashboard.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();
    start().await?;
    info!("Dashboard ready");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=melatea=trace` - Show trace for melatea crates only
/// - Default: INFO, DEBUG for melatea crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,melatea=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_seeds_state() {
        let state = start_with(AppConfig::without_delays()).await.unwrap();

        assert_eq!(state.products.with_catalog(|c| c.products().len()), 9);
        assert_eq!(state.inventory.with_ledger(|l| l.materials().len()), 8);
        assert_eq!(state.queue.with_queue(|q| q.orders().len()), 6);
        assert_eq!(state.transactions.with_book(|b| b.log.len()), 5);
        assert!(!state.auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_seed_fills_fresh_state() {
        let state = AppState::new(AppConfig::without_delays());
        assert_eq!(state.products.with_catalog(|c| c.products().len()), 0);

        seed::seed(&state).await.unwrap();

        assert_eq!(state.products.with_catalog(|c| c.products().len()), 9);
        assert_eq!(state.employees.with_roster(|r| r.employees().len()), 8);
    }
}
