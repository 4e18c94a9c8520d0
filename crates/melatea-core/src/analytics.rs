//! # Analytics Module
//!
//! Figures for the dashboard overview page, computed from the transaction
//! log and the stock ledger.
//!
//! ## Overview Panels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transactions (paid only)                 stock ledger                  │
//! │  ────────────────────────                 ────────────                  │
//! │  PeriodStats today ──┐                    snapshot ──► low_stock_panel  │
//! │  PeriodStats yday ───┴─► DailyComparison  movements ─► recent_receipts  │
//! │  sales_trend(period)                                                    │
//! │  top_products(sort, limit)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Refunded and canceled sales never count.

use chrono::{DateTime, Days, NaiveDate, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::inventory::{MaterialSnapshot, MovementKind, StockMovement, StockStatus};
use crate::money::Money;
use crate::transactions::{Transaction, TransactionStatus};

/// Rows in the top products panel.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Rows in the recent stock received panel.
pub const RECENT_RECEIPTS_LIMIT: usize = 5;

/// Percentage change from `previous` to `current`.
///
/// A `previous` of zero has no baseline and reports no change.
///
/// ## Example
/// ```rust
/// use melatea_core::analytics::percentage_change;
///
/// assert_eq!(percentage_change(1_250_000, 1_000_000), 25.0);
/// assert_eq!(percentage_change(5, 0), 0.0);
/// ```
pub fn percentage_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current - previous) as f64 / previous as f64 * 100.0
}

fn paid(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Paid)
}

// =============================================================================
// Daily Stats
// =============================================================================

/// Headline numbers for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PeriodStats {
    pub orders: usize,
    pub revenue: Money,
    pub products_sold: i64,
    /// Zero on a day without sales.
    pub average_order_value: Money,
}

impl PeriodStats {
    pub fn for_date(transactions: &[Transaction], date: NaiveDate) -> Self {
        let mut stats = paid(transactions)
            .filter(|tx| tx.date() == date)
            .fold(PeriodStats::default(), |mut acc, tx| {
                acc.orders += 1;
                acc.revenue += tx.total;
                acc.products_sold += tx.items.iter().map(|i| i.quantity).sum::<i64>();
                acc
            });

        if stats.orders > 0 {
            stats.average_order_value =
                Money::from_minor(stats.revenue.minor() / stats.orders as i64);
        }
        stats
    }
}

/// Today against yesterday, with the change of each figure in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyComparison {
    pub today: PeriodStats,
    pub yesterday: PeriodStats,
    pub orders_change: f64,
    pub revenue_change: f64,
    pub products_sold_change: f64,
    pub average_order_value_change: f64,
}

impl DailyComparison {
    pub fn for_date(transactions: &[Transaction], today: NaiveDate) -> Self {
        let current = PeriodStats::for_date(transactions, today);
        let previous = today
            .checked_sub_days(Days::new(1))
            .map(|d| PeriodStats::for_date(transactions, d))
            .unwrap_or_default();

        DailyComparison {
            orders_change: percentage_change(current.orders as i64, previous.orders as i64),
            revenue_change: percentage_change(current.revenue.minor(), previous.revenue.minor()),
            products_sold_change: percentage_change(current.products_sold, previous.products_sold),
            average_order_value_change: percentage_change(
                current.average_order_value.minor(),
                previous.average_order_value.minor(),
            ),
            today: current,
            yesterday: previous,
        }
    }
}

// =============================================================================
// Sales Trend
// =============================================================================

/// Chart period buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    /// Hourly buckets for one day.
    #[default]
    Today,
    /// Daily buckets for the last 7 days.
    Week,
    /// Daily buckets for the last 30 days.
    Month,
}

/// One bar of the sales chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesPoint {
    /// `14:00`, `Mon` or `28 Jun`.
    pub period: String,
    pub revenue: Money,
    pub orders: usize,
}

/// Chart data for a period ending on `today`.
///
/// `Today` lists only the hours with sales; the daily periods list every
/// day, including empty ones, oldest first.
pub fn sales_trend(
    transactions: &[Transaction],
    today: NaiveDate,
    period: SalesPeriod,
) -> Vec<SalesPoint> {
    match period {
        SalesPeriod::Today => {
            let mut hours: BTreeMap<u32, SalesPoint> = BTreeMap::new();
            for tx in paid(transactions).filter(|tx| tx.date() == today) {
                let hour = tx.at.hour();
                let point = hours.entry(hour).or_insert_with(|| SalesPoint {
                    period: format!("{:02}:00", hour),
                    revenue: Money::zero(),
                    orders: 0,
                });
                point.revenue += tx.total;
                point.orders += 1;
            }
            hours.into_values().collect()
        }
        SalesPeriod::Week => daily_points(transactions, today, 7, "%a"),
        SalesPeriod::Month => daily_points(transactions, today, 30, "%d %b"),
    }
}

fn daily_points(
    transactions: &[Transaction],
    today: NaiveDate,
    days: u64,
    label: &str,
) -> Vec<SalesPoint> {
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let stats = PeriodStats::for_date(transactions, date);
            SalesPoint {
                period: date.format(label).to_string(),
                revenue: stats.revenue,
                orders: stats.orders,
            }
        })
        .collect()
}

// =============================================================================
// Top Products
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TopProductSort {
    #[default]
    Quantity,
    Revenue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopProduct {
    pub id: String,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Money,
}

/// Best sellers over the given sales, highest first. Ties go by name.
pub fn top_products(
    transactions: &[Transaction],
    sort: TopProductSort,
    limit: usize,
) -> Vec<TopProduct> {
    let mut by_id: BTreeMap<&str, TopProduct> = BTreeMap::new();
    for item in paid(transactions).flat_map(|tx| tx.items.iter()) {
        let entry = by_id.entry(item.id.as_str()).or_insert_with(|| TopProduct {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity_sold: 0,
            revenue: Money::zero(),
        });
        entry.quantity_sold += item.quantity;
        entry.revenue += item.subtotal;
    }

    let mut products: Vec<TopProduct> = by_id.into_values().collect();
    products.sort_by(|a, b| {
        let primary = match sort {
            TopProductSort::Quantity => b.quantity_sold.cmp(&a.quantity_sold),
            TopProductSort::Revenue => b.revenue.cmp(&a.revenue),
        };
        primary.then_with(|| a.name.cmp(&b.name))
    });
    products.truncate(limit);
    products
}

// =============================================================================
// Stock Panels
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LowStockItem {
    pub material_id: String,
    pub name: String,
    #[ts(as = "String")]
    pub current_stock: Decimal,
    #[ts(as = "String")]
    pub threshold: Decimal,
    pub unit: String,
    pub status: StockStatus,
}

/// Materials at or below their threshold, out-of-stock ones first.
pub fn low_stock_panel(snapshot: &[MaterialSnapshot]) -> Vec<LowStockItem> {
    let mut items: Vec<LowStockItem> = snapshot
        .iter()
        .filter(|m| m.status != StockStatus::Sufficient)
        .map(|m| LowStockItem {
            material_id: m.id.clone(),
            name: m.name.clone(),
            current_stock: m.current_stock,
            threshold: m.reorder_threshold,
            unit: m.unit.clone(),
            status: m.status,
        })
        .collect();
    items.sort_by_key(|i| i.status != StockStatus::OutOfStock);
    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockReceived {
    pub material_name: String,
    #[ts(as = "String")]
    pub quantity_received: Decimal,
    pub unit: String,
    pub receiver_name: String,
    #[ts(as = "String")]
    pub at: DateTime<Utc>,
}

/// Latest receive movements, newest first.
pub fn recent_receipts(movements: &[StockMovement], limit: usize) -> Vec<StockReceived> {
    let mut received: Vec<&StockMovement> = movements
        .iter()
        .filter(|m| m.kind == MovementKind::Received)
        .collect();
    received.sort_by(|a, b| b.at.cmp(&a.at).then(b.sequence.cmp(&a.sequence)));

    received
        .into_iter()
        .take(limit)
        .map(|m| StockReceived {
            material_name: m.material_name.clone(),
            quantity_received: m.quantity,
            unit: m.unit.clone(),
            receiver_name: m.employee.clone(),
            at: m.at,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
