//! # Inventory Commands
//!
//! Inventory page, stock history page and the CSV export.
//!
//! ## Stock Movement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  receive_stock ──► ledger.receive ──► movement (+qty)                   │
//! │                                          │                              │
//! │                                          └──► "Stock Received" notice   │
//! │                                                                         │
//! │  consume_stock ──► ledger.consume ──► movement (−qty)                   │
//! │                                          │                              │
//! │                                          └──► low-stock alert if the    │
//! │                                               material crossed its      │
//! │                                               threshold                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use melatea_core::export::{export_file_name, stock_history_csv};
use melatea_core::inventory::{
    ConsumeStock, MaterialSnapshot, NewMaterial, ReceiveStock, StockMovement, StockSummary,
};
use melatea_core::notifications::{low_stock_alerts, Notification};
use melatea_core::query::{
    paginate, MaterialFilter, MovementFilter, MovementSort, MovementSummary, Page,
    INVENTORY_PAGE_SIZE, STOCK_HISTORY_PAGE_SIZE,
};
use melatea_core::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOverview {
    pub summary: StockSummary,
    pub materials: Page<MaterialSnapshot>,
}

/// Stock history table request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockHistoryQuery {
    pub filter: MovementFilter,
    pub sort: MovementSort,
    /// 1-based.
    pub page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockHistoryPage {
    /// Totals over every filtered movement, not just this page.
    pub summary: MovementSummary,
    pub movements: Page<StockMovement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// Status counts plus one filtered page of materials.
pub fn inventory_overview(
    state: &AppState,
    filter: &MaterialFilter,
    page: usize,
) -> Result<InventoryOverview, ApiError> {
    state.auth.require_login()?;
    debug!(search = %filter.search, page, "inventory_overview command");

    let snapshot = state.inventory.with_ledger(|l| l.snapshot());
    Ok(InventoryOverview {
        summary: StockSummary::of(&snapshot),
        materials: paginate(filter.apply(&snapshot), page, INVENTORY_PAGE_SIZE),
    })
}

/// Adds a material. Without a threshold it gets the settings default.
pub async fn register_material(
    state: &AppState,
    material: NewMaterial,
) -> Result<MaterialSnapshot, ApiError> {
    state.auth.require_login()?;
    debug!(material_id = %material.id, "register_material command");

    let default_threshold =
        Decimal::from(state.settings.snapshot().await.notifications.default_reorder_threshold);
    let snapshot = state.inventory.with_ledger_mut(|l| {
        l.register_with_default_threshold(material, default_threshold)
            .map(|m| m.snapshot())
    })?;

    info!(material_id = %snapshot.id, name = %snapshot.name, "Material registered");
    Ok(snapshot)
}

/// Changes a material's reorder threshold.
pub fn set_reorder_threshold(
    state: &AppState,
    material_id: &str,
    threshold: Decimal,
) -> Result<MaterialSnapshot, ApiError> {
    state.auth.require_login()?;
    debug!(
        material_id = %material_id,
        threshold = %threshold,
        "set_reorder_threshold command"
    );

    state.inventory.with_ledger_mut(|l| {
        l.set_threshold(material_id, threshold)?;
        l.material(material_id)
            .map(|m| m.snapshot())
            .ok_or_else(|| ApiError::from(CoreError::MaterialNotFound(material_id.to_string())))
    })
}

/// Records a delivery and posts a "Stock Received" notification.
pub fn receive_stock(state: &AppState, request: ReceiveStock) -> Result<StockMovement, ApiError> {
    state.auth.require_login()?;
    debug!(
        material_id = %request.material_id,
        quantity = %request.quantity,
        "receive_stock command"
    );

    let movement = state
        .inventory
        .with_ledger_mut(|l| l.receive(request))
        .map_err(|e| {
            warn!(error = %e, "Receive rejected");
            ApiError::from(e)
        })?;

    state.notifications.with_center_mut(|c| {
        c.push(Notification::stock_received(
            &movement.material_name,
            movement.quantity,
            &movement.unit,
            movement.at,
        ))
    });

    info!(
        material = %movement.material_name,
        quantity = %movement.quantity,
        stock = %movement.resulting_stock,
        reference = %movement.reference,
        "Stock received"
    );
    Ok(movement)
}

/// Takes stock out for an order.
///
/// Raises a low-stock alert when low-stock alerts are on and the material
/// is now at or below its threshold.
pub async fn consume_stock(
    state: &AppState,
    request: ConsumeStock,
) -> Result<StockMovement, ApiError> {
    state.auth.require_login()?;
    debug!(
        material_id = %request.material_id,
        quantity = %request.quantity,
        "consume_stock command"
    );

    let (movement, material) = state
        .inventory
        .with_ledger_mut(|l| {
            let movement = l.consume_with(request, Utc::now())?;
            let material = l
                .material(&movement.material_id)
                .map(|m| m.snapshot())
                .ok_or_else(|| CoreError::MaterialNotFound(movement.material_id.clone()))?;
            Ok::<_, CoreError>((movement, material))
        })
        .map_err(|e| {
            warn!(error = %e, "Consume rejected");
            ApiError::from(e)
        })?;

    let settings = state.settings.snapshot().await.notifications;
    let alerts = low_stock_alerts(std::slice::from_ref(&material), &settings, movement.at);
    if !alerts.is_empty() {
        let added = state.notifications.with_center_mut(|c| c.merge_alerts(alerts));
        if added > 0 {
            warn!(material = %material.name, stock = %material.current_stock, "Low stock");
        }
    }

    info!(
        material = %movement.material_name,
        quantity = %movement.quantity,
        stock = %movement.resulting_stock,
        reference = %movement.reference,
        "Stock consumed"
    );
    Ok(movement)
}

/// One material's movements, newest first.
pub fn material_history(
    state: &AppState,
    material_id: &str,
) -> Result<Vec<StockMovement>, ApiError> {
    state.auth.require_login()?;
    debug!(material_id = %material_id, "material_history command");

    state.inventory.with_ledger(|l| {
        if l.material(material_id).is_none() {
            return Err(ApiError::not_found("Material", material_id));
        }
        Ok(l.history_of(material_id))
    })
}

fn filtered_movements(
    state: &AppState,
    filter: &MovementFilter,
    sort: MovementSort,
) -> Vec<StockMovement> {
    let mut movements = state.inventory.with_ledger(|l| filter.apply(l.movements()));
    sort.sort(&mut movements);
    movements
}

/// Filtered, sorted, paginated stock history.
pub fn stock_history(
    state: &AppState,
    query: &StockHistoryQuery,
) -> Result<StockHistoryPage, ApiError> {
    state.auth.require_login()?;
    debug!(search = %query.filter.search, page = query.page, "stock_history command");

    let movements = filtered_movements(state, &query.filter, query.sort);
    Ok(StockHistoryPage {
        summary: MovementSummary::of(&movements),
        movements: paginate(movements, query.page, STOCK_HISTORY_PAGE_SIZE),
    })
}

/// Exports every movement matching the filter, in table order.
pub fn export_stock_history(
    state: &AppState,
    filter: &MovementFilter,
    sort: MovementSort,
) -> Result<CsvExport, ApiError> {
    state.auth.require_login()?;
    debug!("export_stock_history command");

    let movements = filtered_movements(state, filter, sort);
    let export = CsvExport {
        file_name: export_file_name(Utc::now().date_naive()),
        content: stock_history_csv(&movements)?,
    };

    info!(rows = movements.len(), file = %export.file_name, "Stock history exported");
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::notifications::list_notifications;
    use crate::commands::test_support::logged_in_state;
    use crate::error::ErrorCode;
    use melatea_core::inventory::{MovementKind, StockStatus};

    fn receive(material_id: &str, quantity: i64) -> ReceiveStock {
        ReceiveStock {
            material_id: material_id.to_string(),
            quantity: Decimal::from(quantity),
            note: None,
            reference: Some("PO-2025-010".to_string()),
            employee: "Airlangga W.".to_string(),
        }
    }

    fn consume(material_id: &str, quantity: i64) -> ConsumeStock {
        ConsumeStock {
            material_id: material_id.to_string(),
            quantity: Decimal::from(quantity),
            reference: "ORD-010".to_string(),
            note: None,
            employee: None,
        }
    }

    #[tokio::test]
    async fn test_seeded_overview() {
        let state = logged_in_state().await;

        let overview = inventory_overview(&state, &MaterialFilter::default(), 1).unwrap();
        assert_eq!(overview.summary.total, 8);
        assert_eq!(overview.summary.out_of_stock, 2);
        assert_eq!(overview.summary.low_stock, 2);

        let low = MaterialFilter {
            status: Some(StockStatus::LowStock),
            ..Default::default()
        };
        let names: Vec<String> = inventory_overview(&state, &low, 1)
            .unwrap()
            .materials
            .items
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Green Tea Leaves", "Matcha Powder"]);
    }

    #[tokio::test]
    async fn test_receive_then_consume_round_trip() {
        let state = logged_in_state().await;
        let before = state
            .inventory
            .with_ledger(|l| l.material("4").map(|m| m.current_stock()));

        let received = receive_stock(&state, receive("4", 12)).unwrap();
        assert_eq!(received.kind, MovementKind::Received);
        consume_stock(&state, consume("4", 12)).await.unwrap();

        let after = state
            .inventory
            .with_ledger(|l| l.material("4").map(|m| m.current_stock()));
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_receive_posts_notification() {
        let state = logged_in_state().await;
        receive_stock(&state, receive("8", 20)).unwrap();

        let notifications = list_notifications(&state).unwrap();
        assert_eq!(
            notifications.items[0].message,
            "Peach Syrup restocked (20 L received)"
        );
    }

    #[tokio::test]
    async fn test_consume_more_than_stock_rejected() {
        let state = logged_in_state().await;

        let err = consume_stock(&state, consume("6", 9)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(
            state
                .inventory
                .with_ledger(|l| l.material("6").map(|m| m.current_stock())),
            Some(Decimal::from(8))
        );
    }

    #[tokio::test]
    async fn test_consume_below_threshold_raises_alert() {
        let state = logged_in_state().await;
        let before = list_notifications(&state).unwrap().unread_count;

        // Sugar: 80 kg, threshold 25
        consume_stock(&state, consume("4", 60)).await.unwrap();

        let after = list_notifications(&state).unwrap();
        assert_eq!(after.unread_count, before + 1);
        assert_eq!(after.items[0].message, "Sugar running low (20 kg remaining)");
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let state = logged_in_state().await;

        let history = material_history(&state, "1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reference, "PO-2025-001");
        assert_eq!(history[1].quantity, Decimal::from(-5));

        let err = material_history(&state, "missing").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_stock_history_page_and_summary() {
        let state = logged_in_state().await;

        let query = StockHistoryQuery {
            filter: MovementFilter {
                kind: Some(MovementKind::Received),
                ..Default::default()
            },
            page: 1,
            ..Default::default()
        };
        let page = stock_history(&state, &query).unwrap();

        assert_eq!(page.movements.total_items, 3);
        assert_eq!(page.summary.received_count, 3);
        assert_eq!(page.summary.consumed_count, 0);
        assert_eq!(page.movements.items[0].material_name, "Black Tea Leaves");
    }

    #[tokio::test]
    async fn test_export_csv() {
        let state = logged_in_state().await;

        let filter = MovementFilter {
            search: "honey".to_string(),
            ..Default::default()
        };
        let export = export_stock_history(&state, &filter, MovementSort::default()).unwrap();

        assert!(export.file_name.starts_with("stock-history-"));
        assert!(export.file_name.ends_with(".csv"));
        assert_eq!(export.content.lines().count(), 2);
        assert!(export.content.contains("\"+10\""));
        assert!(export.content.contains("\"PO-2025-003\""));
    }

    #[tokio::test]
    async fn test_register_uses_settings_threshold() {
        let state = logged_in_state().await;

        let material = register_material(&state, NewMaterial::new("9", "Tapioca Pearls", "kg"))
            .await
            .unwrap();
        assert_eq!(material.reorder_threshold, Decimal::from(10));
        assert_eq!(material.status, StockStatus::OutOfStock);

        let updated = set_reorder_threshold(&state, "9", Decimal::from(4)).unwrap();
        assert_eq!(updated.reorder_threshold, Decimal::from(4));
    }

    #[tokio::test]
    async fn test_register_rejects_negative_opening_stock() {
        let state = logged_in_state().await;

        let err = register_material(
            &state,
            NewMaterial::new("99", "Boba", "kg").opening_stock(Decimal::from(-5)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, format!("opening stock must be from 0 to {}", i64::MAX));
        assert!(state.inventory.with_ledger(|l| l.material("99").is_none()));
    }
}
