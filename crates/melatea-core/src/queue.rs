//! # Order Queue Module
//!
//! Orders waiting for the kitchen, fed by completed sales.
//!
//! ## Status Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐  start   ┌───────────┐  ready  ┌───────┐  serve ┌──────┐ │
//! │   │ Pending │─────────►│ Preparing │────────►│ Ready │───────►│Served│ │
//! │   └────┬────┘◄─────────└─────┬─────┘         └───────┘        └──────┘ │
//! │        │       back          │                                          │
//! │        │ cancel              │ cancel                                   │
//! │        ▼                     ▼                                          │
//! │   ┌──────────────────────────────┐                                      │
//! │   │           Canceled           │                                      │
//! │   └──────────────────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The queue lists urgent orders first, then high, then normal; newest
//! first within a priority.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::transactions::Transaction;

/// Minutes estimated for an order that starts preparing without an estimate.
pub const DEFAULT_PREP_MINUTES: u32 = 10;

/// Assigned when an order starts preparing with nobody named.
pub const KITCHEN_STAFF: &str = "Kitchen Staff";

// =============================================================================
// Status & Priority
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Canceled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Moves the kitchen screen offers from this status.
    pub fn can_move_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        matches!(
            (self, next),
            (Pending, Preparing)
                | (Pending, Canceled)
                | (Preparing, Ready)
                | (Preparing, Pending)
                | (Preparing, Canceled)
                | (Ready, Served)
        )
    }
}

/// Declaration order is queue order: `Urgent > High > Normal`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderPriority {
    #[default]
    Normal,
    High,
    Urgent,
}

// =============================================================================
// Queue Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QueueItem {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QueueOrder {
    pub id: String,
    /// `ORD-001`, `ORD-002`, ...
    pub order_number: String,
    #[ts(as = "String")]
    pub order_time: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<QueueItem>,
    pub assigned_employee: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub customer: Option<String>,
    pub total: Money,
    pub priority: OrderPriority,
}

impl QueueOrder {
    /// Age of the order as shown on its card.
    ///
    /// `Just now` under a minute, `12m ago` under an hour, then `HH:MM`.
    pub fn time_label(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.order_time).num_minutes();
        match minutes {
            m if m < 1 => "Just now".to_string(),
            m if m < 60 => format!("{}m ago", m),
            _ => self.order_time.format("%H:%M").to_string(),
        }
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Filter & Counts
// =============================================================================

/// Filters for the queue page. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct QueueFilter {
    /// Matched case-insensitively against order number, item names and
    /// customer.
    pub search: String,
    pub status: Option<OrderStatus>,
    /// Exact assigned employee name.
    pub employee: Option<String>,
    pub priority: Option<OrderPriority>,
}

impl QueueFilter {
    pub fn matches(&self, order: &QueueOrder) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || order.order_number.to_lowercase().contains(&needle)
            || order
                .items
                .iter()
                .any(|i| i.name.to_lowercase().contains(&needle))
            || order
                .customer
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle));

        matches_search
            && self.status.map_or(true, |s| order.status == s)
            && self
                .employee
                .as_deref()
                .map_or(true, |e| order.assigned_employee.as_deref() == Some(e))
            && self.priority.map_or(true, |p| order.priority == p)
    }
}

/// Count badges above the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatusCounts {
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
    pub served: usize,
    pub canceled: usize,
}

impl StatusCounts {
    pub fn of(orders: &[QueueOrder]) -> Self {
        orders.iter().fold(StatusCounts::default(), |mut acc, o| {
            match o.status {
                OrderStatus::Pending => acc.pending += 1,
                OrderStatus::Preparing => acc.preparing += 1,
                OrderStatus::Ready => acc.ready += 1,
                OrderStatus::Served => acc.served += 1,
                OrderStatus::Canceled => acc.canceled += 1,
            }
            acc
        })
    }
}

// =============================================================================
// Queue
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct OrderQueue {
    orders: Vec<QueueOrder>,
    last_number: u32,
}

impl OrderQueue {
    pub fn new() -> Self {
        OrderQueue::default()
    }

    /// Inserts an existing order as-is (seed data). Later sales are numbered
    /// after it.
    pub fn insert(&mut self, order: QueueOrder) {
        if let Some(n) = order
            .order_number
            .strip_prefix("ORD-")
            .and_then(|n| n.parse::<u32>().ok())
        {
            self.last_number = self.last_number.max(n);
        }
        self.orders.push(order);
    }

    pub fn orders(&self) -> &[QueueOrder] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&QueueOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Queues a paid sale as a pending, normal-priority order.
    pub fn enqueue_sale(&mut self, sale: &Transaction) -> QueueOrder {
        self.last_number += 1;

        let order = QueueOrder {
            id: sale.id.clone(),
            order_number: format!("ORD-{:03}", self.last_number),
            order_time: sale.at,
            status: OrderStatus::Pending,
            items: sale
                .items
                .iter()
                .map(|i| QueueItem {
                    id: i.id.clone(),
                    name: i.name.clone(),
                    quantity: i.quantity,
                    notes: None,
                })
                .collect(),
            assigned_employee: None,
            estimated_minutes: None,
            customer: Some(sale.customer.clone()),
            total: sale.total,
            priority: OrderPriority::Normal,
        };
        self.orders.push(order.clone());
        order
    }

    /// Moves an order to `status`.
    ///
    /// A given employee replaces the assignee. Starting preparation fills in
    /// [`KITCHEN_STAFF`] and [`DEFAULT_PREP_MINUTES`] when they are missing.
    ///
    /// ## Errors
    /// - `CoreError::OrderNotFound` for an unknown id
    /// - `CoreError::InvalidOrderTransition` for a move the flow forbids
    pub fn update_status(
        &mut self,
        id: &str,
        status: OrderStatus,
        employee: Option<String>,
    ) -> CoreResult<QueueOrder> {
        let order = self.get_mut(id)?;

        if !order.status.can_move_to(status) {
            return Err(CoreError::InvalidOrderTransition {
                order: order.order_number.clone(),
                from: order.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        order.status = status;
        if let Some(employee) = employee.filter(|e| !e.trim().is_empty()) {
            order.assigned_employee = Some(employee.trim().to_string());
        }
        if status == OrderStatus::Preparing {
            order
                .assigned_employee
                .get_or_insert_with(|| KITCHEN_STAFF.to_string());
            order.estimated_minutes.get_or_insert(DEFAULT_PREP_MINUTES);
        }
        Ok(order.clone())
    }

    pub fn set_priority(&mut self, id: &str, priority: OrderPriority) -> CoreResult<QueueOrder> {
        let order = self.get_mut(id)?;
        order.priority = priority;
        Ok(order.clone())
    }

    /// Matching orders in queue order.
    pub fn list(&self, filter: &QueueFilter) -> Vec<QueueOrder> {
        let mut orders: Vec<_> = self
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.order_time.cmp(&a.order_time))
        });
        orders
    }

    /// Assignees for the employee filter dropdown, sorted and de-duplicated.
    pub fn employees(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .orders
            .iter()
            .filter_map(|o| o.assigned_employee.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn get_mut(&mut self, id: &str) -> CoreResult<&mut QueueOrder> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::payment::CompletedPayment;
    use crate::types::{PaymentMethod, Product};
    use chrono::{Duration, TimeZone};

    fn at(h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 28, h, mi, 0).unwrap()
    }

    fn order(
        n: u32,
        time: DateTime<Utc>,
        status: OrderStatus,
        priority: OrderPriority,
    ) -> QueueOrder {
        QueueOrder {
            id: n.to_string(),
            order_number: format!("ORD-{:03}", n),
            order_time: time,
            status,
            items: vec![QueueItem {
                id: "2".to_string(),
                name: "Thai Milk Tea".to_string(),
                quantity: 2,
                notes: None,
            }],
            assigned_employee: None,
            estimated_minutes: None,
            customer: Some(format!("Customer {n}")),
            total: Money::from_minor(58_000),
            priority,
        }
    }

    fn queue() -> OrderQueue {
        let mut queue = OrderQueue::new();
        queue.insert(order(1, at(14, 30), OrderStatus::Pending, OrderPriority::Normal));
        queue.insert(order(2, at(14, 25), OrderStatus::Preparing, OrderPriority::High));
        queue.insert(order(3, at(14, 20), OrderStatus::Ready, OrderPriority::Urgent));
        queue.insert(order(4, at(14, 15), OrderStatus::Served, OrderPriority::Normal));
        queue
    }

    fn sale() -> Transaction {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("1", "Classic Tea", Money::from_minor(20_000)))
            .unwrap();
        let payment = CompletedPayment {
            method: PaymentMethod::Cash,
            total: Money::from_minor(20_000),
            paid: Money::from_minor(20_000),
            change: Money::zero(),
        };
        Transaction::from_sale("INV-20250628-001", None, "Cashier", at(14, 40), &cart, &payment)
    }

    #[test]
    fn test_enqueue_sale_numbers_after_seed() {
        let mut queue = queue();
        let queued = queue.enqueue_sale(&sale());

        assert_eq!(queued.order_number, "ORD-005");
        assert_eq!(queued.status, OrderStatus::Pending);
        assert_eq!(queued.priority, OrderPriority::Normal);
        assert_eq!(queued.total, Money::from_minor(20_000));
        assert_eq!(queued.items[0].name, "Classic Tea");
        assert_eq!(queued.customer.as_deref(), Some("Walk-in Customer"));
        assert_eq!(queue.orders().len(), 5);
    }

    #[test]
    fn test_list_orders_by_priority_then_newest() {
        let mut queue = queue();
        queue.insert(order(5, at(14, 10), OrderStatus::Pending, OrderPriority::Normal));

        let numbers: Vec<_> = queue
            .list(&QueueFilter::default())
            .into_iter()
            .map(|o| o.order_number)
            .collect();
        assert_eq!(numbers, vec!["ORD-003", "ORD-002", "ORD-001", "ORD-004", "ORD-005"]);
    }

    #[test]
    fn test_start_preparing_fills_defaults() {
        let mut queue = queue();

        let started = queue.update_status("1", OrderStatus::Preparing, None).unwrap();
        assert_eq!(started.assigned_employee.as_deref(), Some(KITCHEN_STAFF));
        assert_eq!(started.estimated_minutes, Some(DEFAULT_PREP_MINUTES));

        let back = queue.update_status("1", OrderStatus::Pending, None).unwrap();
        assert_eq!(back.status, OrderStatus::Pending);

        let restarted = queue
            .update_status("1", OrderStatus::Preparing, Some("Sarah M.".to_string()))
            .unwrap();
        assert_eq!(restarted.assigned_employee.as_deref(), Some("Sarah M."));
        assert_eq!(restarted.estimated_minutes, Some(DEFAULT_PREP_MINUTES));
    }

    #[test]
    fn test_full_kitchen_flow() {
        let mut queue = queue();
        queue.update_status("1", OrderStatus::Preparing, None).unwrap();
        queue.update_status("1", OrderStatus::Ready, None).unwrap();
        let served = queue.update_status("1", OrderStatus::Served, None).unwrap();
        assert_eq!(served.status, OrderStatus::Served);
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut queue = queue();

        let err = queue.update_status("1", OrderStatus::Served, None).unwrap_err();
        assert_eq!(err.to_string(), "Order ORD-001 is pending, cannot move to served");
        assert_eq!(queue.get("1").unwrap().status, OrderStatus::Pending);

        assert!(queue.update_status("3", OrderStatus::Canceled, None).is_err());
        assert!(queue.update_status("4", OrderStatus::Pending, None).is_err());
        assert!(matches!(
            queue.update_status("99", OrderStatus::Ready, None),
            Err(CoreError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_cancel_pending_and_preparing() {
        let mut queue = queue();
        assert!(queue.update_status("1", OrderStatus::Canceled, None).is_ok());
        assert!(queue.update_status("2", OrderStatus::Canceled, None).is_ok());

        let counts = StatusCounts::of(queue.orders());
        assert_eq!(counts.canceled, 2);
        assert_eq!(counts.pending, 0);
    }

    #[test]
    fn test_filter_and_counts() {
        let mut queue = queue();
        queue
            .update_status("1", OrderStatus::Preparing, Some("Mike R.".to_string()))
            .unwrap();

        let by_customer = queue.list(&QueueFilter {
            search: "customer 3".to_string(),
            ..Default::default()
        });
        assert_eq!(by_customer.len(), 1);

        let by_item = queue.list(&QueueFilter {
            search: "THAI".to_string(),
            ..Default::default()
        });
        assert_eq!(by_item.len(), 4);

        let mike = queue.list(&QueueFilter {
            employee: Some("Mike R.".to_string()),
            ..Default::default()
        });
        assert_eq!(mike.len(), 1);

        let normal = queue.list(&QueueFilter {
            priority: Some(OrderPriority::Normal),
            ..Default::default()
        });
        let counts = StatusCounts::of(&normal);
        assert_eq!(counts.preparing, 1);
        assert_eq!(counts.served, 1);
        assert_eq!(counts.ready, 0);

        assert_eq!(queue.employees(), vec!["Mike R.".to_string()]);
    }

    #[test]
    fn test_set_priority_reorders() {
        let mut queue = queue();
        queue.set_priority("4", OrderPriority::Urgent).unwrap();

        let first = &queue.list(&QueueFilter::default())[0];
        assert_eq!(first.order_number, "ORD-003");
        let second = &queue.list(&QueueFilter::default())[1];
        assert_eq!(second.order_number, "ORD-004");
    }

    #[test]
    fn test_time_label() {
        let order = order(1, at(14, 30), OrderStatus::Pending, OrderPriority::Normal);

        assert_eq!(order.time_label(at(14, 30) + Duration::seconds(30)), "Just now");
        assert_eq!(order.time_label(at(14, 42)), "12m ago");
        assert_eq!(order.time_label(at(16, 0)), "14:30");
        assert_eq!(order.item_count(), 2);
    }
}
