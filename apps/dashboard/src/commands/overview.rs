//! # Dashboard Overview Command
//!
//! The home page after login.
//!
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┐
//! │ Orders  +x%  │ Revenue +x%  │ Sold    +x%  │ Avg     +x%  │  today vs yesterday
//! ├──────────────┴──────────────┴──────┬───────┴──────────────┤
//! │ Sales chart (today/week/month)     │ Top products         │  same period
//! ├────────────────────────────────────┼──────────────────────┤
//! │ Low stock                          │ Recently received    │
//! └────────────────────────────────────┴──────────────────────┘
//! ```

use chrono::{Days, NaiveDate, Utc};
use melatea_core::analytics::{
    low_stock_panel, recent_receipts, sales_trend, top_products, DailyComparison, LowStockItem,
    SalesPeriod, SalesPoint, StockReceived, TopProduct, TopProductSort, RECENT_RECEIPTS_LIMIT,
    TOP_PRODUCTS_LIMIT,
};
use melatea_core::transactions::Transaction;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverviewQuery {
    /// Day treated as "today". Defaults to the current UTC date.
    pub date: Option<NaiveDate>,
    pub period: SalesPeriod,
    pub top_sort: TopProductSort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub date: NaiveDate,
    pub comparison: DailyComparison,
    pub sales: Vec<SalesPoint>,
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<LowStockItem>,
    pub recently_received: Vec<StockReceived>,
}

pub fn dashboard_overview(
    state: &AppState,
    query: &OverviewQuery,
) -> Result<DashboardOverview, ApiError> {
    state.auth.require_login()?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    debug!(%date, period = ?query.period, "dashboard_overview command");

    let (comparison, sales, top) = state.transactions.with_book(|book| {
        let txs = book.log.transactions();
        let window: Vec<Transaction> = txs
            .iter()
            .filter(|tx| in_period(tx.date(), date, query.period))
            .cloned()
            .collect();
        (
            DailyComparison::for_date(txs, date),
            sales_trend(txs, date, query.period),
            top_products(&window, query.top_sort, TOP_PRODUCTS_LIMIT),
        )
    });

    let (low_stock, recently_received) = state.inventory.with_ledger(|l| {
        (
            low_stock_panel(&l.snapshot()),
            recent_receipts(l.movements(), RECENT_RECEIPTS_LIMIT),
        )
    });

    Ok(DashboardOverview {
        date,
        comparison,
        sales,
        top_products: top,
        low_stock,
        recently_received,
    })
}

fn in_period(day: NaiveDate, today: NaiveDate, period: SalesPeriod) -> bool {
    let days = match period {
        SalesPeriod::Today => 1,
        SalesPeriod::Week => 7,
        SalesPeriod::Month => 30,
    };
    let first = today.checked_sub_days(Days::new(days - 1)).unwrap_or(today);
    day >= first && day <= today
}
