//! # Query Module
//!
//! Filtering, sorting and pagination for the stock history and inventory
//! tables.
//!
//! ## Pipeline
//! ```text
//! movements ──► MovementFilter ──► MovementSort ──► paginate(page, 15)
//!                    │
//!                    └──► MovementSummary (over the filtered set)
//! ```
//!
//! Dates are compared on the UTC calendar date of a movement, inclusive on
//! both ends.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::inventory::{MaterialSnapshot, MovementKind, StockMovement, StockStatus};
use crate::types::SortDirection;

/// Rows per page on the stock history page.
pub const STOCK_HISTORY_PAGE_SIZE: usize = 15;

/// Rows per page on the inventory page.
pub const INVENTORY_PAGE_SIZE: usize = 10;

// =============================================================================
// Date Range
// =============================================================================

/// Quick filter buttons above the history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QuickRange {
    Today,
    Week,
    Month,
    All,
}

/// Inclusive calendar-date range. `None` bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "Option<String>")]
    pub from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Range selected by a quick filter, relative to `today`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use melatea_core::query::{DateRange, QuickRange};
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
    /// let week = DateRange::quick(today, QuickRange::Week);
    /// assert_eq!(week.from, NaiveDate::from_ymd_opt(2025, 6, 21));
    /// assert_eq!(week.to, Some(today));
    /// ```
    pub fn quick(today: NaiveDate, range: QuickRange) -> Self {
        match range {
            QuickRange::Today => DateRange {
                from: Some(today),
                to: Some(today),
            },
            QuickRange::Week => DateRange {
                from: today.checked_sub_days(Days::new(7)),
                to: Some(today),
            },
            QuickRange::Month => DateRange {
                from: today.checked_sub_months(Months::new(1)),
                to: Some(today),
            },
            QuickRange::All => DateRange::default(),
        }
    }

    /// Checks a date against the range, inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

// =============================================================================
// Movement Filter
// =============================================================================

/// Filters for the stock history table. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct MovementFilter {
    /// Matched case-insensitively against material name, reference and note.
    pub search: String,
    #[ts(as = "Option<String>")]
    pub date_from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub date_to: Option<NaiveDate>,
    pub kind: Option<MovementKind>,
    pub material_id: Option<String>,
}

impl MovementFilter {
    pub fn date_range(&self) -> DateRange {
        DateRange {
            from: self.date_from,
            to: self.date_to,
        }
    }

    /// Checks a single movement against every filter.
    pub fn matches(&self, movement: &StockMovement) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || movement.material_name.to_lowercase().contains(&needle)
            || movement.reference.to_lowercase().contains(&needle)
            || movement.note.to_lowercase().contains(&needle);

        matches_search
            && self.date_range().contains(movement.at.date_naive())
            && self.kind.map_or(true, |kind| movement.kind == kind)
            && self
                .material_id
                .as_deref()
                .map_or(true, |id| movement.material_id == id)
    }

    /// Returns the matching movements, preserving input order.
    pub fn apply(&self, movements: &[StockMovement]) -> Vec<StockMovement> {
        movements
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Movement Sort
// =============================================================================

/// Sortable columns of the stock history table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum MovementSortField {
    #[default]
    DateTime,
    MaterialName,
    Kind,
    Quantity,
    ResultingStock,
}

/// Column and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MovementSort {
    pub field: MovementSortField,
    pub direction: SortDirection,
}

impl MovementSort {
    /// Next sort after clicking a column header.
    ///
    /// The same column flips direction, a new column starts ascending.
    pub fn clicked(self, field: MovementSortField) -> Self {
        if self.field == field {
            MovementSort {
                field,
                direction: self.direction.toggled(),
            }
        } else {
            MovementSort {
                field,
                direction: SortDirection::Asc,
            }
        }
    }

    fn compare(&self, a: &StockMovement, b: &StockMovement) -> Ordering {
        let ordering = match self.field {
            MovementSortField::DateTime => a.at.cmp(&b.at).then(a.sequence.cmp(&b.sequence)),
            MovementSortField::MaterialName => a
                .material_name
                .to_lowercase()
                .cmp(&b.material_name.to_lowercase()),
            MovementSortField::Kind => a.kind.label().cmp(b.kind.label()),
            MovementSortField::Quantity => a.quantity.cmp(&b.quantity),
            MovementSortField::ResultingStock => a.resulting_stock.cmp(&b.resulting_stock),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Sorts in place. Stable for equal keys.
    pub fn sort(&self, movements: &mut [StockMovement]) {
        movements.sort_by(|a, b| self.compare(a, b));
    }
}

// =============================================================================
// Movement Summary
// =============================================================================

/// Totals shown above the history table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MovementSummary {
    pub received_count: usize,
    pub consumed_count: usize,
    #[ts(as = "String")]
    pub total_received: Decimal,
    /// Absolute value of all consumption.
    #[ts(as = "String")]
    pub total_consumed: Decimal,
}

impl MovementSummary {
    pub fn of(movements: &[StockMovement]) -> Self {
        movements
            .iter()
            .fold(MovementSummary::default(), |mut acc, m| {
                match m.kind {
                    MovementKind::Received => {
                        acc.received_count += 1;
                        acc.total_received += m.quantity.abs();
                    }
                    MovementKind::Consumed => {
                        acc.consumed_count += 1;
                        acc.total_consumed += m.quantity.abs();
                    }
                }
                acc
            })
    }
}

// =============================================================================
// Material Filter
// =============================================================================

/// Filters for the inventory table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct MaterialFilter {
    /// Matched case-insensitively against name and supplier.
    pub search: String,
    pub status: Option<StockStatus>,
}

impl MaterialFilter {
    pub fn matches(&self, material: &MaterialSnapshot) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || material.name.to_lowercase().contains(&needle)
            || material
                .supplier
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle));

        matches_search && self.status.map_or(true, |status| material.status == status)
    }

    pub fn apply(&self, materials: &[MaterialSnapshot]) -> Vec<MaterialSnapshot> {
        materials
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Cuts `items` into pages and returns page `page` (1-based).
///
/// Page 0 is treated as page 1. Pages past the end are empty. A `per_page`
/// of 0 is treated as 1.
///
/// ## Example
/// ```rust
/// use melatea_core::query::paginate;
///
/// let page = paginate((1..=32).collect::<Vec<_>>(), 3, 15);
/// assert_eq!(page.items, vec![31, 32]);
/// assert_eq!(page.total_pages, 3);
/// ```
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page);

    let items = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
