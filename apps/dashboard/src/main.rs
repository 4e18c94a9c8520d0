//! # MelaTea Dashboard Entry Point
//!
//! Loads configuration, seeds the in-memory store and reports its status.
//! The setup lives in lib.rs so tests can drive it directly.

use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(e) = melatea_dashboard::run().await {
        error!(error = %e, "Dashboard failed to start");
        std::process::exit(1);
    }
}
