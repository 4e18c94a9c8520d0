//! # Export Module
//!
//! CSV export of the stock history table.
//!
//! Every field is quoted and embedded quotes are doubled, so notes with
//! commas or quotes survive a spreadsheet import unchanged.
//!
//! ```text
//! "Date/Time","Material Name","Movement Type","Quantity",...
//! "28 Jun 2025, 08:00","Black Tea Leaves","Received","+50",...
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{CoreError, CoreResult};
use crate::inventory::{MovementKind, StockMovement};

/// Header row of the stock history export.
pub const STOCK_HISTORY_HEADERS: [&str; 9] = [
    "Date/Time",
    "Material Name",
    "Movement Type",
    "Quantity",
    "Unit",
    "Current Stock",
    "Reference",
    "Employee",
    "Notes",
];

/// Formats a timestamp the way the dashboard tables show it: `28 Jun 2025, 08:00`.
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y, %H:%M").to_string()
}

/// Download name for an export made on `date`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use melatea_core::export::export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
/// assert_eq!(export_file_name(date), "stock-history-2025-06-28.csv");
/// ```
pub fn export_file_name(date: NaiveDate) -> String {
    format!("stock-history-{}.csv", date.format("%Y-%m-%d"))
}

fn quantity_cell(movement: &StockMovement) -> String {
    let quantity = movement.quantity.normalize();
    match movement.kind {
        MovementKind::Received => format!("+{}", quantity),
        MovementKind::Consumed => quantity.to_string(),
    }
}

/// Renders movements as CSV, in the order given.
///
/// ## Errors
/// - `CoreError::Export` if the writer fails
pub fn stock_history_csv(movements: &[StockMovement]) -> CoreResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(STOCK_HISTORY_HEADERS).map_err(export_error)?;

    for movement in movements {
        writer
            .write_record([
                format_date_time(movement.at),
                movement.material_name.clone(),
                movement.kind.label().to_string(),
                quantity_cell(movement),
                movement.unit.clone(),
                movement.resulting_stock.normalize().to_string(),
                movement.reference.clone(),
                movement.employee.clone(),
                movement.note.clone(),
            ])
            .map_err(export_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Export(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
}

fn export_error(err: csv::Error) -> CoreError {
    CoreError::Export(err.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{NewMaterial, ReceiveStock, StockLedger};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 28, 8, 5, 0).unwrap()
    }

    fn ledger() -> StockLedger {
        let mut ledger = StockLedger::new();
        ledger
            .register(
                NewMaterial::new("2", "Green Tea Leaves", "kg")
                    .opening_stock(Decimal::from(25))
                    .as_of(t0()),
            )
            .unwrap();
        ledger
    }

    #[test]
    fn test_header_only_for_empty_history() {
        let csv = stock_history_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "\"Date/Time\",\"Material Name\",\"Movement Type\",\"Quantity\",\"Unit\",\
             \"Current Stock\",\"Reference\",\"Employee\",\"Notes\"\n"
        );
    }

    #[test]
    fn test_rows_are_quoted_and_signed() {
        let mut ledger = ledger();
        ledger
            .receive_at(
                ReceiveStock {
                    material_id: "2".to_string(),
                    quantity: Decimal::new(125, 1),
                    note: Some("Delivery, \"urgent\"".to_string()),
                    reference: Some("PO-2025-003".to_string()),
                    employee: "Sarah M.".to_string(),
                },
                t0(),
            )
            .unwrap();
        ledger
            .consume_at("2", Decimal::from(5), "ORD-010", t0())
            .unwrap();

        let csv = stock_history_csv(ledger.movements()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "\"28 Jun 2025, 08:05\",\"Green Tea Leaves\",\"Received\",\"+12.5\",\"kg\",\
             \"37.5\",\"PO-2025-003\",\"Sarah M.\",\"Delivery, \"\"urgent\"\"\""
        );
        assert_eq!(
            lines[2],
            "\"28 Jun 2025, 08:05\",\"Green Tea Leaves\",\"Consumed\",\"-5\",\"kg\",\
             \"32.5\",\"ORD-010\",\"System\",\"Order production\""
        );
    }

    #[test]
    fn test_format_date_time_pads_fields() {
        let at = Utc.with_ymd_and_hms(2025, 1, 3, 7, 9, 0).unwrap();
        assert_eq!(format_date_time(at), "03 Jan 2025, 07:09");
    }
}
