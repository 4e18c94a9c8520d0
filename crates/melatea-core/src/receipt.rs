//! # Receipt Module
//!
//! Receipt model, HTML rendering and invoice numbering.
//!
//! ## Receipt Layout
//! ```text
//! ┌───────────────────────────────┐
//! │           MelaTea             │
//! │   Jl. Raya No. 123, Jakarta   │
//! ├───────────────────────────────┤
//! │ Invoice:     INV-20250628-001 │
//! │ Date:      28 Jun 2025, 14:30 │
//! │ Cashier:         Airlangga W. │
//! │ Payment:                 Cash │
//! ├───────────────────────────────┤
//! │ Thai Milk Tea x2    Rp 58.000 │
//! │ Classic Tea x1      Rp 20.000 │
//! ├───────────────────────────────┤
//! │ Total:              Rp 78.000 │
//! │ Paid:               Rp 80.000 │
//! │ Change:              Rp 2.000 │  ← only when change > 0
//! ├───────────────────────────────┤
//! │   Thank you for your visit!   │
//! │       Please come again       │
//! └───────────────────────────────┘
//! ```

use askama::Template;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::CoreResult;
use crate::export::format_date_time;
use crate::money::{CurrencyFormat, Money};
use crate::payment::CompletedPayment;
use crate::settings::GeneralSettings;
use crate::types::PaymentMethod;

/// Cashier printed on receipts until per-user sessions exist.
pub const DEFAULT_CASHIER: &str = "Airlangga W.";

// =============================================================================
// Receipt Model
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub line_total: Money,
}

/// Everything printed on one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Receipt {
    pub store_name: String,
    pub store_address: String,
    pub invoice_number: String,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    pub cashier: String,
    pub payment_method: PaymentMethod,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
}

/// Askama view of a receipt; all money is preformatted.
#[derive(Template)]
#[template(path = "receipt.html")]
struct ReceiptHtml<'a> {
    store_name: &'a str,
    store_address: &'a str,
    invoice_number: &'a str,
    date: String,
    cashier: &'a str,
    payment: &'a str,
    lines: Vec<LineView<'a>>,
    total: String,
    paid: String,
    change: Option<String>,
}

struct LineView<'a> {
    name: &'a str,
    quantity: i64,
    total: String,
}

impl Receipt {
    /// Builds the receipt for a completed sale.
    pub fn for_sale(
        store: &GeneralSettings,
        invoice_number: impl Into<String>,
        issued_at: DateTime<Utc>,
        cashier: impl Into<String>,
        cart: &Cart,
        payment: &CompletedPayment,
    ) -> Self {
        Receipt {
            store_name: store.store_name.clone(),
            store_address: store.store_address.clone(),
            invoice_number: invoice_number.into(),
            issued_at,
            cashier: cashier.into(),
            payment_method: payment.method,
            lines: cart
                .items()
                .iter()
                .map(|item| ReceiptLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total(),
                })
                .collect(),
            total: payment.total,
            paid: payment.paid,
            change: payment.change,
        }
    }

    /// Sample receipt shown next to the settings form.
    pub fn preview(store: &GeneralSettings, issued_at: DateTime<Utc>) -> Self {
        Receipt {
            store_name: store.store_name.clone(),
            store_address: store.store_address.clone(),
            invoice_number: "INV-20250628-001".to_string(),
            issued_at,
            cashier: DEFAULT_CASHIER.to_string(),
            payment_method: PaymentMethod::Cash,
            lines: vec![
                ReceiptLine {
                    name: "Thai Milk Tea".to_string(),
                    quantity: 2,
                    line_total: Money::from_minor(58_000),
                },
                ReceiptLine {
                    name: "Classic Tea".to_string(),
                    quantity: 1,
                    line_total: Money::from_minor(20_000),
                },
            ],
            total: Money::from_minor(78_000),
            paid: Money::from_minor(80_000),
            change: Money::from_minor(2_000),
        }
    }

    /// Renders the receipt as a printable HTML document in rupiah.
    pub fn render_html(&self) -> CoreResult<String> {
        self.render_html_with(&CurrencyFormat::default())
    }

    /// Renders with a specific currency format.
    ///
    /// Text is HTML-escaped. The change line is left out when there is no
    /// change, the address line when the address is empty.
    pub fn render_html_with(&self, currency: &CurrencyFormat) -> CoreResult<String> {
        let view = ReceiptHtml {
            store_name: &self.store_name,
            store_address: self.store_address.trim(),
            invoice_number: &self.invoice_number,
            date: format_date_time(self.issued_at),
            cashier: &self.cashier,
            payment: self.payment_method.label(),
            lines: self
                .lines
                .iter()
                .map(|line| LineView {
                    name: &line.name,
                    quantity: line.quantity,
                    total: currency.format(line.line_total),
                })
                .collect(),
            total: currency.format(self.total),
            paid: currency.format(self.paid),
            change: self
                .change
                .is_positive()
                .then(|| currency.format(self.change)),
        };

        Ok(view.render()?)
    }
}

// =============================================================================
// Invoice Numbers
// =============================================================================

/// Issues invoice numbers of the form `INV-YYYYMMDD-NNN`.
///
/// The counter starts at 001 for each calendar day. Each day keeps its own
/// counter, so a number is never issued twice even if the clock steps back.
#[derive(Debug, Clone, Default)]
pub struct InvoiceSequence {
    issued: BTreeMap<NaiveDate, u32>,
}

impl InvoiceSequence {
    pub fn new() -> Self {
        InvoiceSequence::default()
    }

    /// Next number for `date`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use melatea_core::receipt::InvoiceSequence;
    ///
    /// let mut seq = InvoiceSequence::new();
    /// let day = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
    /// assert_eq!(seq.next(day), "INV-20250628-001");
    /// assert_eq!(seq.next(day), "INV-20250628-002");
    /// ```
    pub fn next(&mut self, date: NaiveDate) -> String {
        let counter = self.issued.entry(date).or_insert(0);
        *counter += 1;
        format!("INV-{}-{:03}", date.format("%Y%m%d"), counter)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
