//! # Notification Commands
//!
//! The header bell: list, mark read, refresh.

use chrono::Utc;
use melatea_core::notifications::{low_stock_alerts, Notification};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub items: Vec<Notification>,
    pub unread_count: usize,
}

/// Newest first.
pub fn list_notifications(state: &AppState) -> Result<NotificationsResponse, ApiError> {
    state.auth.require_login()?;

    Ok(state.notifications.with_center(|c| NotificationsResponse {
        items: c.list().to_vec(),
        unread_count: c.unread_count(),
    }))
}

pub fn mark_notification_read(state: &AppState, id: &str) -> Result<(), ApiError> {
    state.auth.require_login()?;
    debug!(notification_id = %id, "mark_notification_read command");

    if state.notifications.with_center_mut(|c| c.mark_as_read(id)) {
        Ok(())
    } else {
        Err(ApiError::not_found("Notification", id))
    }
}

pub fn mark_all_notifications_read(state: &AppState) -> Result<(), ApiError> {
    state.auth.require_login()?;
    debug!("mark_all_notifications_read command");

    state.notifications.with_center_mut(|c| c.mark_all_as_read());
    Ok(())
}

/// Re-derives low-stock alerts after the simulated refresh delay.
///
/// Alerts already waiting unread are not duplicated.
pub async fn refresh_notifications(state: &AppState) -> Result<NotificationsResponse, ApiError> {
    state.auth.require_login()?;
    debug!("refresh_notifications command");

    tokio::time::sleep(state.config.refresh_delay).await;

    let settings = state.settings.snapshot().await.notifications;
    let alerts = state
        .inventory
        .with_ledger(|l| low_stock_alerts(&l.snapshot(), &settings, Utc::now()));
    let added = state.notifications.with_center_mut(|c| c.merge_alerts(alerts));
    if added > 0 {
        info!(added, "New low-stock alerts");
    }

    list_notifications(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::settings::update_setting;
    use crate::commands::test_support::logged_in_state;
    use crate::error::ErrorCode;
    use melatea_core::settings::SettingsSection;
    use serde_json::json;

    #[tokio::test]
    async fn test_seeded_bell() {
        let state = logged_in_state().await;

        let bell = list_notifications(&state).unwrap();
        // printer alert plus four derived low-stock alerts
        assert_eq!(bell.unread_count, 5);
        assert_eq!(bell.items.len(), 7);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let state = logged_in_state().await;
        let id = list_notifications(&state).unwrap().items[0].id.clone();

        mark_notification_read(&state, &id).unwrap();
        assert_eq!(list_notifications(&state).unwrap().unread_count, 4);

        let err = mark_notification_read(&state, "missing").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        mark_all_notifications_read(&state).unwrap();
        assert_eq!(list_notifications(&state).unwrap().unread_count, 0);
    }

    #[tokio::test]
    async fn test_refresh_does_not_duplicate_pending() {
        let state = logged_in_state().await;

        let bell = refresh_notifications(&state).await.unwrap();
        assert_eq!(bell.items.len(), 7);

        mark_all_notifications_read(&state).unwrap();
        let bell = refresh_notifications(&state).await.unwrap();
        assert_eq!(bell.unread_count, 4);
    }

    #[tokio::test]
    async fn test_refresh_respects_alert_setting() {
        let state = logged_in_state().await;
        mark_all_notifications_read(&state).unwrap();
        update_setting(&state, SettingsSection::Notifications, "lowStockAlert", json!(false))
            .await
            .unwrap();

        let bell = refresh_notifications(&state).await.unwrap();
        assert_eq!(bell.unread_count, 0);
    }
}
