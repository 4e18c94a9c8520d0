//! # Settings Commands
//!
//! ```text
//! update_setting ──► dirty = true ──► save_settings ──► validate
//!                                                          │
//!                                     simulated delay ◄────┘
//!                                            │
//!                                            ▼
//!                                      dirty = false
//! ```
//!
//! Edits apply immediately; saving only clears the unsaved-changes flag.
//! Nothing is persisted.

use chrono::Utc;
use melatea_core::receipt::Receipt;
use melatea_core::settings::{Settings, SettingsSection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: Settings,
    /// Unsaved changes pending.
    pub dirty: bool,
}

pub async fn get_settings(state: &AppState) -> Result<SettingsResponse, ApiError> {
    state.auth.require_login()?;
    debug!("get_settings command");

    let store = state.settings.lock().await;
    Ok(SettingsResponse {
        settings: store.settings().clone(),
        dirty: store.is_dirty(),
    })
}

/// Replaces one field, e.g. `(Printer, "autoPrint", false)`.
pub async fn update_setting(
    state: &AppState,
    section: SettingsSection,
    field: &str,
    value: Value,
) -> Result<SettingsResponse, ApiError> {
    state.auth.require_login()?;
    debug!(section = %section.as_str(), field = %field, "update_setting command");

    let mut store = state.settings.lock().await;
    store.update(section, field, value).map_err(|e| {
        warn!(section = %section.as_str(), field = %field, error = %e, "Setting rejected");
        ApiError::from(e)
    })?;

    Ok(SettingsResponse {
        settings: store.settings().clone(),
        dirty: store.is_dirty(),
    })
}

/// Validates, waits the simulated save delay, then marks the settings saved.
pub async fn save_settings(state: &AppState) -> Result<SettingsResponse, ApiError> {
    state.auth.require_login()?;
    debug!("save_settings command");

    let mut store = state.settings.lock().await;
    store.settings().validate()?;

    tokio::time::sleep(state.config.save_delay).await;
    store.mark_saved();
    info!(store_name = %store.settings().general.store_name, "Settings saved");

    Ok(SettingsResponse {
        settings: store.settings().clone(),
        dirty: false,
    })
}

/// Sample receipt rendered with the current store details.
pub async fn receipt_preview(state: &AppState) -> Result<String, ApiError> {
    state.auth.require_login()?;

    let general = state.settings.snapshot().await.general;
    Ok(Receipt::preview(&general, Utc::now()).render_html()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_state;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_then_save() {
        let state = logged_in_state().await;

        let updated = update_setting(
            &state,
            SettingsSection::PaymentMethods,
            "transfer",
            json!(true),
        )
        .await
        .unwrap();
        assert!(updated.settings.payment_methods.transfer);
        assert!(updated.dirty);

        let saved = save_settings(&state).await.unwrap();
        assert!(!saved.dirty);
        assert!(saved.settings.payment_methods.transfer);
        assert!(!get_settings(&state).await.unwrap().dirty);
    }

    #[tokio::test]
    async fn test_unknown_field_rejected() {
        let state = logged_in_state().await;

        let err = update_setting(&state, SettingsSection::General, "colour", json!("red"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!get_settings(&state).await.unwrap().dirty);
    }

    #[tokio::test]
    async fn test_save_requires_store_name() {
        let state = logged_in_state().await;
        update_setting(&state, SettingsSection::General, "storeName", json!("  "))
            .await
            .unwrap();

        let err = save_settings(&state).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_settings(&state).await.unwrap().dirty);
    }

    #[tokio::test]
    async fn test_receipt_preview_follows_store_name() {
        let state = logged_in_state().await;
        update_setting(
            &state,
            SettingsSection::General,
            "storeName",
            json!("MelaTea Bandung"),
        )
        .await
        .unwrap();

        let html = receipt_preview(&state).await.unwrap();
        assert!(html.contains("MelaTea Bandung"));
        assert!(html.contains("INV-20250628-001"));
    }
}
