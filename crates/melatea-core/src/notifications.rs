//! # Notifications Module
//!
//! The notification bell: a newest-first list with read flags, plus the
//! rules that turn stock levels into low-stock alerts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::inventory::{MaterialSnapshot, StockStatus};
use crate::settings::NotificationSettings;

/// Title of every derived low-stock alert.
pub const LOW_STOCK_TITLE: &str = "Low Stock Alert";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Stock,
    Order,
    System,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    #[ts(as = "String")]
    pub at: DateTime<Utc>,
    pub is_read: bool,
}

impl Notification {
    /// A new unread notification.
    pub fn new(
        kind: NotificationKind,
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Notification {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            message: message.into(),
            category,
            at,
            is_read: false,
        }
    }

    /// Confirmation posted after stock is received.
    pub fn stock_received(name: &str, quantity: Decimal, unit: &str, at: DateTime<Utc>) -> Self {
        Notification::new(
            NotificationKind::Success,
            NotificationCategory::Stock,
            "Stock Received",
            format!("{} restocked ({} {} received)", name, quantity.normalize(), unit),
            at,
        )
    }
}

/// Low-stock warnings for the given materials.
///
/// Returns nothing when low-stock alerts are switched off in settings.
///
/// ## Messages
/// - `Milk Powder is out of stock`
/// - `Green Tea Leaves running low (8 kg remaining)`
pub fn low_stock_alerts(
    materials: &[MaterialSnapshot],
    settings: &NotificationSettings,
    at: DateTime<Utc>,
) -> Vec<Notification> {
    if !settings.low_stock_alert {
        return Vec::new();
    }

    materials
        .iter()
        .filter_map(|m| {
            let message = match m.status {
                StockStatus::OutOfStock => format!("{} is out of stock", m.name),
                StockStatus::LowStock => format!(
                    "{} running low ({} {} remaining)",
                    m.name,
                    m.current_stock.normalize(),
                    m.unit
                ),
                StockStatus::Sufficient => return None,
            };
            Some(Notification::new(
                NotificationKind::Warning,
                NotificationCategory::Stock,
                LOW_STOCK_TITLE,
                message,
                at,
            ))
        })
        .collect()
}

// =============================================================================
// Notification Center
// =============================================================================

/// All notifications, newest first.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        NotificationCenter::default()
    }

    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Marks one notification read. Returns false if the id is unknown.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        self.items.iter_mut().for_each(|n| n.is_read = true);
    }

    /// Pushes alerts whose message is not already waiting unread.
    ///
    /// Returns how many were added.
    pub fn merge_alerts(&mut self, alerts: Vec<Notification>) -> usize {
        let mut added = 0;
        for alert in alerts {
            let pending = self
                .items
                .iter()
                .any(|n| !n.is_read && n.title == alert.title && n.message == alert.message);
            if !pending {
                self.push(alert);
                added += 1;
            }
        }
        added
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
