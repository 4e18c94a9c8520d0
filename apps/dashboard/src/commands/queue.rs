//! # Order Queue Commands
//!
//! The kitchen board. Paid sales land here as pending orders and move
//! through the prep flow:
//!
//! ```text
//! pending ──► preparing ──► ready ──► served
//!    │  ▲          │
//!    │  └──────────┤
//!    ▼             ▼
//! canceled ◄───────┘
//! ```

use chrono::Utc;
use melatea_core::queue::{OrderPriority, OrderStatus, QueueFilter, QueueOrder, StatusCounts};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// One card on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueCard {
    #[serde(flatten)]
    pub order: QueueOrder,
    pub time_label: String,
    pub item_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueBoard {
    pub orders: Vec<QueueCard>,
    /// Badges count the filtered orders.
    pub counts: StatusCounts,
    pub employees: Vec<String>,
}

pub fn list_orders(state: &AppState, filter: &QueueFilter) -> Result<QueueBoard, ApiError> {
    state.auth.require_login()?;
    debug!(search = %filter.search, status = ?filter.status, "list_orders command");

    let now = Utc::now();
    let (orders, employees) = state
        .queue
        .with_queue(|q| (q.list(filter), q.employees()));

    Ok(QueueBoard {
        counts: StatusCounts::of(&orders),
        orders: orders
            .into_iter()
            .map(|order| QueueCard {
                time_label: order.time_label(now),
                item_count: order.item_count(),
                order,
            })
            .collect(),
        employees,
    })
}

/// Moves an order along the prep flow, optionally reassigning it.
pub fn update_order_status(
    state: &AppState,
    id: &str,
    status: OrderStatus,
    employee: Option<String>,
) -> Result<QueueOrder, ApiError> {
    state.auth.require_login()?;
    debug!(order_id = %id, status = status.as_str(), "update_order_status command");

    let order = state
        .queue
        .with_queue_mut(|q| q.update_status(id, status, employee))
        .map_err(|e| {
            warn!(order_id = %id, error = %e, "Order status change rejected");
            ApiError::from(e)
        })?;

    info!(
        order = %order.order_number,
        status = order.status.as_str(),
        employee = order.assigned_employee.as_deref().unwrap_or("-"),
        "Order status updated"
    );
    Ok(order)
}

pub fn set_order_priority(
    state: &AppState,
    id: &str,
    priority: OrderPriority,
) -> Result<QueueOrder, ApiError> {
    state.auth.require_login()?;
    debug!(order_id = %id, ?priority, "set_order_priority command");

    let order = state
        .queue
        .with_queue_mut(|q| q.set_priority(id, priority))?;

    info!(order = %order.order_number, ?priority, "Order priority changed");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_state;
    use crate::error::ErrorCode;

    fn numbers(board: &QueueBoard) -> Vec<&str> {
        board
            .orders
            .iter()
            .map(|c| c.order.order_number.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_board_in_priority_order() {
        let state = logged_in_state().await;

        let board = list_orders(&state, &QueueFilter::default()).unwrap();
        assert_eq!(
            numbers(&board),
            vec!["ORD-003", "ORD-002", "ORD-006", "ORD-001", "ORD-004", "ORD-005"]
        );
        assert_eq!(
            board.counts,
            StatusCounts {
                pending: 2,
                preparing: 2,
                ready: 1,
                served: 1,
                canceled: 0,
            }
        );
        assert_eq!(board.employees.len(), 4);
        assert_eq!(board.orders[0].time_label, "14:20");
        assert_eq!(board.orders[0].item_count, 3);
    }

    #[tokio::test]
    async fn test_filtered_counts() {
        let state = logged_in_state().await;

        let filter = QueueFilter {
            search: "matcha".to_string(),
            ..Default::default()
        };
        let board = list_orders(&state, &filter).unwrap();
        assert_eq!(numbers(&board), vec!["ORD-002", "ORD-006"]);
        assert_eq!(board.counts.preparing, 2);
        assert_eq!(board.counts.pending, 0);

        let filter = QueueFilter {
            employee: Some("Mike R.".to_string()),
            ..Default::default()
        };
        assert_eq!(numbers(&list_orders(&state, &filter).unwrap()), vec!["ORD-003"]);
    }

    #[tokio::test]
    async fn test_start_then_ready() {
        let state = logged_in_state().await;

        let started = update_order_status(&state, "1", OrderStatus::Preparing, None).unwrap();
        assert_eq!(started.assigned_employee.as_deref(), Some("Kitchen Staff"));
        assert_eq!(started.estimated_minutes, Some(10));

        let ready =
            update_order_status(&state, "1", OrderStatus::Ready, Some("Sarah M.".to_string()))
                .unwrap();
        assert_eq!(ready.status, OrderStatus::Ready);
        assert_eq!(ready.assigned_employee.as_deref(), Some("Sarah M."));
    }

    #[tokio::test]
    async fn test_forbidden_move_rejected() {
        let state = logged_in_state().await;

        let err = update_order_status(&state, "4", OrderStatus::Pending, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Order ORD-004 is served, cannot move to pending");

        let err = update_order_status(&state, "99", OrderStatus::Ready, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_raise_priority_moves_order_up() {
        let state = logged_in_state().await;

        set_order_priority(&state, "1", OrderPriority::Urgent).unwrap();
        let board = list_orders(&state, &QueueFilter::default()).unwrap();
        assert_eq!(numbers(&board)[..2], ["ORD-001", "ORD-003"]);
    }
}
