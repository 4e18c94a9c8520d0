//! # Transactions Module
//!
//! Completed sales. Each transaction is a frozen snapshot of the cart and
//! payment at the moment the payment went through.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::money::Money;
use crate::payment::CompletedPayment;
use crate::query::DateRange;
use crate::types::PaymentMethod;

/// Rows per page on the transactions page.
pub const TRANSACTIONS_PAGE_SIZE: usize = 10;

/// Customer recorded when the cashier does not enter one.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Paid,
    Refunded,
    Canceled,
}

impl TransactionStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "Paid",
            TransactionStatus::Refunded => "Refunded",
            TransactionStatus::Canceled => "Canceled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionItem {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub price: Money,
    pub subtotal: Money,
}

/// One completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub invoice_number: String,
    pub customer: String,
    pub cashier: String,
    #[ts(as = "String")]
    pub at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub items: Vec<TransactionItem>,
    pub subtotal: Money,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Snapshots a paid cart.
    pub fn from_sale(
        invoice_number: impl Into<String>,
        customer: Option<String>,
        cashier: impl Into<String>,
        at: DateTime<Utc>,
        cart: &Cart,
        payment: &CompletedPayment,
    ) -> Self {
        let items: Vec<TransactionItem> = cart
            .items()
            .iter()
            .map(|item| TransactionItem {
                id: item.id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                price: item.unit_price,
                subtotal: item.line_total(),
            })
            .collect();

        Transaction {
            id: Uuid::new_v4().to_string(),
            invoice_number: invoice_number.into(),
            customer: customer
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string()),
            cashier: cashier.into(),
            at,
            payment_method: payment.method,
            subtotal: items.iter().map(|i| i.subtotal).sum(),
            items,
            total: payment.total,
            paid: payment.paid,
            change: payment.change,
            status: TransactionStatus::Paid,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.at.date_naive()
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Filters for the transactions table. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct TransactionFilter {
    /// Matched case-insensitively against invoice, customer and cashier.
    pub search: String,
    #[ts(as = "Option<String>")]
    pub date_from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub date_to: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || tx.invoice_number.to_lowercase().contains(&needle)
            || tx.customer.to_lowercase().contains(&needle)
            || tx.cashier.to_lowercase().contains(&needle);

        let range = DateRange {
            from: self.date_from,
            to: self.date_to,
        };

        matches_search
            && range.contains(tx.date())
            && self.payment_method.map_or(true, |m| tx.payment_method == m)
            && self.status.map_or(true, |s| tx.status == s)
    }
}

/// Sum of totals of paid transactions. Refunded and canceled sales are ignored.
pub fn revenue(transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Paid)
        .map(|tx| tx.total)
        .sum()
}

// =============================================================================
// Transaction Log
// =============================================================================

/// Read-only history; the only write is recording a new sale.
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        TransactionLog::default()
    }

    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// All transactions, newest first.
    pub fn list(&self) -> Vec<Transaction> {
        self.filter(&TransactionFilter::default())
    }

    /// Matching transactions, newest first.
    pub fn filter(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        let mut found: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.at.cmp(&a.at));
        found
    }

    /// All transactions in recording order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn find_by_invoice(&self, invoice_number: &str) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|tx| tx.invoice_number == invoice_number)
    }

    pub fn revenue(&self) -> Money {
        revenue(&self.transactions)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use chrono::{Duration, TimeZone};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 28, 14, 30, 0).unwrap()
    }

    fn sale(invoice: &str, customer: Option<&str>, method: PaymentMethod, when: DateTime<Utc>) -> Transaction {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("2", "Thai Milk Tea", Money::from_minor(29_000)))
            .unwrap();
        cart.add_item(&Product::new("2", "Thai Milk Tea", Money::from_minor(29_000)))
            .unwrap();
        cart.add_item(&Product::new("1", "Classic Tea", Money::from_minor(20_000)))
            .unwrap();

        let payment = CompletedPayment {
            method,
            total: cart.total(),
            paid: Money::from_minor(80_000),
            change: Money::from_minor(2_000),
        };
        Transaction::from_sale(
            invoice,
            customer.map(str::to_string),
            "Airlangga W.",
            when,
            &cart,
            &payment,
        )
    }

    fn log() -> TransactionLog {
        let mut log = TransactionLog::new();
        log.record(sale("INV-20250627-015", Some("Bob Wilson"), PaymentMethod::Qris, at() - Duration::days(1)));
        log.record(sale("INV-20250628-001", Some("John Doe"), PaymentMethod::Cash, at()));
        let mut refunded = sale("INV-20250628-002", None, PaymentMethod::Card, at() + Duration::hours(1));
        refunded.status = TransactionStatus::Refunded;
        log.record(refunded);
        log
    }

    #[test]
    fn test_from_sale_snapshots_cart() {
        let tx = sale("INV-20250628-001", None, PaymentMethod::Cash, at());

        assert_eq!(tx.customer, WALK_IN_CUSTOMER);
        assert_eq!(tx.items.len(), 2);
        assert_eq!(tx.items[0].subtotal, Money::from_minor(58_000));
        assert_eq!(tx.subtotal, Money::from_minor(78_000));
        assert_eq!(tx.total, Money::from_minor(78_000));
        assert_eq!(tx.change, Money::from_minor(2_000));
        assert_eq!(tx.status, TransactionStatus::Paid);
    }

    #[test]
    fn test_list_newest_first() {
        let invoices: Vec<String> = log().list().into_iter().map(|t| t.invoice_number).collect();
        assert_eq!(
            invoices,
            vec!["INV-20250628-002", "INV-20250628-001", "INV-20250627-015"]
        );
    }

    #[test]
    fn test_filter_search_and_method() {
        let log = log();

        let by_customer = TransactionFilter {
            search: "bob".to_string(),
            ..Default::default()
        };
        assert_eq!(log.filter(&by_customer).len(), 1);

        let by_cashier = TransactionFilter {
            search: "airlangga".to_string(),
            ..Default::default()
        };
        assert_eq!(log.filter(&by_cashier).len(), 3);

        let cash = TransactionFilter {
            payment_method: Some(PaymentMethod::Cash),
            ..Default::default()
        };
        assert_eq!(log.filter(&cash)[0].invoice_number, "INV-20250628-001");
    }

    #[test]
    fn test_filter_date_and_status() {
        let log = log();
        let today = TransactionFilter {
            date_from: NaiveDate::from_ymd_opt(2025, 6, 28),
            date_to: NaiveDate::from_ymd_opt(2025, 6, 28),
            status: Some(TransactionStatus::Paid),
            ..Default::default()
        };

        let found = log.filter(&today);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].customer, "John Doe");
    }

    #[test]
    fn test_revenue_counts_paid_only() {
        let log = log();
        assert_eq!(log.revenue(), Money::from_minor(156_000));
        assert!(log.find_by_invoice("INV-20250628-002").is_some());
        assert_eq!(log.len(), 3);
    }
}
