//! # Auth Commands
//!
//! ## Login Flow
//! ```text
//! login(username, password)
//!      │
//!      ├── username blank?         ──► VALIDATION_ERROR
//!      ├── password < 4 chars?     ──► VALIDATION_ERROR
//!      │
//!      ▼
//! simulated delay ──► flag set ──► employee's last login updated (if known)
//! ```

use chrono::Utc;
use melatea_core::validation::{validate_password, validate_required};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Logs in. Any username with a valid password is accepted.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<(), ApiError> {
    debug!(username = %username, "login command");

    let username = validate_required("username", username).map_err(|e| {
        warn!(error = %e, "Login rejected");
        ApiError::from(e)
    })?;
    validate_password(password).map_err(|e| {
        warn!(error = %e, "Login rejected");
        ApiError::from(e)
    })?;

    tokio::time::sleep(state.config.login_delay).await;

    let now = Utc::now();
    state.employees.with_roster_mut(|roster| {
        let known = roster
            .employees()
            .iter()
            .find(|e| e.email.eq_ignore_ascii_case(&username))
            .map(|e| e.id.clone());
        if let Some(id) = known {
            // Known id, cannot fail
            let _ = roster.record_login(&id, now);
        }
    });

    state.auth.sign_in(username.clone());
    info!(username = %username, "Logged in");
    Ok(())
}

pub fn logout(state: &AppState) {
    debug!("logout command");
    state.auth.sign_out();
    info!("Logged out");
}

pub fn is_logged_in(state: &AppState) -> bool {
    state.auth.is_logged_in()
}
