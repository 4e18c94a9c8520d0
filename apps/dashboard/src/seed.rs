//! # Demo Data
//!
//! The products, stock, staff, sales, kitchen queue and notifications a
//! fresh dashboard starts with. Everything is in memory; a restart reseeds.
//!
//! Stock history is replayed through the ledger rather than written
//! directly, so every material's stock matches its movements.

use chrono::{DateTime, Duration, TimeZone, Utc};
use melatea_core::employees::{Employee, EmployeeRole, EmployeeStatus};
use melatea_core::inventory::{ConsumeStock, NewMaterial, ReceiveStock};
use melatea_core::notifications::{
    low_stock_alerts, Notification, NotificationCategory, NotificationKind,
};
use melatea_core::products::{Availability, CatalogProduct, ProductCategory};
use melatea_core::queue::{OrderPriority, OrderStatus, QueueItem, QueueOrder};
use melatea_core::transactions::{Transaction, TransactionItem, TransactionStatus};
use melatea_core::{CoreResult, Money, PaymentMethod};
use rust_decimal::Decimal;
use tracing::info;

use crate::state::AppState;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_default()
}

/// Clock the demo data is anchored to.
fn demo_now() -> DateTime<Utc> {
    at(2025, 6, 28, 14, 35)
}

// =============================================================================
// Products
// =============================================================================

fn seed_products(state: &AppState) {
    use Availability::*;
    use ProductCategory::*;

    #[rustfmt::skip]
    let products = [
        ("1", "Classic Tea", "Traditional black tea with a rich, bold flavor", 20_000, "🍵",
            HotTea, Available, at(2025, 6, 28, 14, 30), at(2025, 6, 28, 14, 30)),
        ("2", "Thai Milk Tea", "Creamy Thai-style milk tea with condensed milk", 29_000, "🧋",
            MilkTea, Available, at(2025, 6, 27, 16, 45), at(2025, 6, 28, 10, 15)),
        ("3", "Matcha Latte", "Premium Japanese matcha with steamed milk", 30_000, "🍃",
            Specialty, Available, at(2025, 6, 26, 9, 20), at(2025, 6, 27, 11, 30)),
        ("4", "Peach Iced Tea", "Refreshing iced tea with natural peach flavor", 25_000, "🍑",
            IcedTea, OutOfStock, at(2025, 6, 25, 13, 10), at(2025, 6, 28, 8, 45)),
        ("5", "Honey Lemon Tea", "Soothing tea with natural honey and fresh lemon", 22_000, "🍯",
            HotTea, Available, at(2025, 6, 24, 15, 25), at(2025, 6, 24, 15, 25)),
        ("6", "Jasmine Green Tea", "Delicate green tea with jasmine flower essence", 27_000, "🌼",
            GreenTea, Available, at(2025, 6, 23, 12, 40), at(2025, 6, 26, 14, 20)),
        ("7", "Black Tea", "Strong and robust black tea blend", 21_000, "☕",
            HotTea, Available, at(2025, 6, 22, 10, 15), at(2025, 6, 22, 10, 15)),
        ("8", "Lychee Tea", "Exotic lychee flavored tea with tropical notes", 28_000, "🫧",
            FruitTea, OutOfStock, at(2025, 6, 21, 17, 30), at(2025, 6, 27, 9, 10)),
        ("9", "Mint Tea", "Refreshing mint tea with cooling properties", 23_000, "🌿",
            HerbalTea, Available, at(2025, 6, 20, 11, 50), at(2025, 6, 25, 16, 35)),
    ];

    state.products.with_catalog_mut(|catalog| {
        for (id, name, description, price, icon, category, availability, created, updated) in
            products
        {
            catalog.insert(CatalogProduct {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price: Money::from_minor(price),
                icon: icon.to_string(),
                category,
                availability,
                created_at: created,
                updated_at: updated,
            });
        }
    });
}

/// Fills an empty state with the demo data.
pub async fn seed(state: &AppState) -> CoreResult<()> {
    seed_products(state);
    seed_inventory(state)?;
    seed_employees(state);
    seed_transactions(state);
    seed_queue(state);
    seed_notifications(state).await;

    info!(
        products = state.products.with_catalog(|c| c.products().len()),
        queued = state.queue.with_queue(|q| q.orders().len()),
        materials = state.inventory.with_ledger(|l| l.materials().len()),
        employees = state.employees.with_roster(|r| r.employees().len()),
        transactions = state.transactions.with_book(|b| b.log.len()),
        "Demo data seeded"
    );
    Ok(())
}

// =============================================================================
// Inventory
// =============================================================================

fn seed_inventory(state: &AppState) -> CoreResult<()> {
    let opened = at(2025, 6, 25, 8, 0);

    // (id, name, unit, opening stock, threshold, unit cost, supplier)
    let materials = [
        ("1", "Black Tea Leaves", "kg", 105, 50, 85_000, "Tea Garden Co."),
        ("2", "Green Tea Leaves", "kg", 35, 30, 120_000, "Premium Tea Ltd."),
        ("3", "Milk Powder", "kg", 20, 20, 45_000, "Dairy Fresh"),
        ("4", "Sugar", "kg", 55, 25, 15_000, "Sweet Supply"),
        ("5", "Honey", "kg", 5, 10, 180_000, "Natural Honey Co."),
        ("6", "Matcha Powder", "kg", 8, 15, 450_000, "Japan Tea Import"),
        ("7", "Lemon Juice", "L", 35, 20, 25_000, "Fresh Citrus"),
        ("8", "Peach Syrup", "L", 0, 10, 35_000, "Fruit Flavors Inc."),
    ];

    state.inventory.with_ledger_mut(|ledger| {
        for (id, name, unit, stock, threshold, cost, supplier) in materials {
            ledger.register(
                NewMaterial::new(id, name, unit)
                    .opening_stock(Decimal::from(stock))
                    .threshold(Decimal::from(threshold))
                    .cost(Money::from_minor(cost))
                    .supplier(supplier)
                    .as_of(opened),
            )?;
        }

        ledger.consume_with(
            consumption("3", 20, "ORD-003", "Used for milk tea production", "James B."),
            at(2025, 6, 27, 16, 45),
        )?;
        ledger.receive_at(
            receipt("5", 10, "PO-2025-003", "Premium organic honey", "Emma W."),
            at(2025, 6, 28, 9, 20),
        )?;
        ledger.consume_with(
            consumption("2", 10, "ORD-002", "Used for Jasmine Green Tea", "Lisa C."),
            at(2025, 6, 28, 10, 30),
        )?;
        ledger.receive_at(
            receipt("4", 25, "PO-2025-002", "Emergency restock", "Mike R."),
            at(2025, 6, 28, 11, 45),
        )?;
        ledger.consume_with(
            consumption("1", 5, "ORD-001", "Used for Thai Milk Tea production", "Sarah M."),
            at(2025, 6, 28, 12, 15),
        )?;
        ledger.receive_at(
            receipt("1", 50, "PO-2025-001", "Weekly delivery from supplier", "Airlangga W."),
            at(2025, 6, 28, 14, 30),
        )?;
        Ok(())
    })
}

fn receipt(
    material_id: &str,
    quantity: i64,
    reference: &str,
    note: &str,
    employee: &str,
) -> ReceiveStock {
    ReceiveStock {
        material_id: material_id.to_string(),
        quantity: Decimal::from(quantity),
        note: Some(note.to_string()),
        reference: Some(reference.to_string()),
        employee: employee.to_string(),
    }
}

fn consumption(
    material_id: &str,
    quantity: i64,
    reference: &str,
    note: &str,
    employee: &str,
) -> ConsumeStock {
    ConsumeStock {
        material_id: material_id.to_string(),
        quantity: Decimal::from(quantity),
        reference: reference.to_string(),
        note: Some(note.to_string()),
        employee: Some(employee.to_string()),
    }
}

// =============================================================================
// Employees
// =============================================================================

fn seed_employees(state: &AppState) {
    use EmployeeRole::*;
    use EmployeeStatus::*;

    #[rustfmt::skip]
    let staff = [
        ("1", "Airlangga W.", "airlangga@melatea.com", Manager, Active, at(2025, 6, 28, 14, 30), at(2025, 1, 15, 9, 0)),
        ("2", "Sarah Martinez", "sarah.m@melatea.com", Supervisor, Active, at(2025, 6, 28, 13, 45), at(2025, 2, 20, 10, 30)),
        ("3", "Mike Rodriguez", "mike.r@melatea.com", Cashier, Active, at(2025, 6, 28, 12, 15), at(2025, 3, 10, 14, 15)),
        ("4", "Lisa Chen", "lisa.c@melatea.com", Cashier, Active, at(2025, 6, 27, 18, 30), at(2025, 4, 5, 11, 45)),
        ("5", "David Thompson", "david.t@melatea.com", Cashier, Inactive, at(2025, 6, 20, 16, 45), at(2025, 1, 30, 13, 20)),
        ("6", "Emma Wilson", "emma.w@melatea.com", Supervisor, Active, at(2025, 6, 28, 10, 20), at(2025, 5, 12, 16, 30)),
        ("7", "James Brown", "james.b@melatea.com", Cashier, Inactive, at(2025, 6, 15, 14, 10), at(2025, 3, 25, 12, 0)),
        ("8", "Anna Garcia", "anna.g@melatea.com", Cashier, Active, at(2025, 6, 28, 9, 45), at(2025, 4, 18, 15, 45)),
    ];

    state.employees.with_roster_mut(|roster| {
        for (id, name, email, role, status, last_login, created_at) in staff {
            roster.insert(Employee {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role,
                status,
                last_login: Some(last_login),
                created_at,
                updated_at: last_login,
            });
        }
    });
}

// =============================================================================
// Transactions
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn sale(
    id: &str,
    invoice_number: &str,
    customer: &str,
    cashier: &str,
    when: DateTime<Utc>,
    payment_method: PaymentMethod,
    status: TransactionStatus,
    paid: i64,
    lines: &[(&str, &str, i64, i64)],
) -> Transaction {
    let items: Vec<TransactionItem> = lines
        .iter()
        .map(|&(item_id, name, quantity, price)| {
            let price = Money::from_minor(price);
            TransactionItem {
                id: item_id.to_string(),
                name: name.to_string(),
                quantity,
                price,
                subtotal: price.multiply_quantity(quantity),
            }
        })
        .collect();
    let total: Money = items.iter().map(|i| i.subtotal).sum();
    let paid = Money::from_minor(paid);

    Transaction {
        id: id.to_string(),
        invoice_number: invoice_number.to_string(),
        customer: customer.to_string(),
        cashier: cashier.to_string(),
        at: when,
        payment_method,
        items,
        subtotal: total,
        total,
        paid,
        change: paid.saturating_diff(total),
        status,
    }
}

fn seed_transactions(state: &AppState) {
    use PaymentMethod::*;
    use TransactionStatus::*;

    #[rustfmt::skip]
    let sales = [
        sale("1", "INV-20250628-001", "John Doe", "Airlangga W.", at(2025, 6, 28, 14, 30), Cash, Paid, 80_000,
            &[("2", "Thai Milk Tea", 2, 29_000), ("1", "Classic Tea", 1, 20_000)]),
        sale("2", "INV-20250628-002", "Jane Smith", "Airlangga W.", at(2025, 6, 28, 15, 45), Card, Paid, 52_000,
            &[("3", "Matcha Latte", 1, 30_000), ("5", "Honey Lemon Tea", 1, 22_000)]),
        sale("3", "INV-20250627-015", "Bob Wilson", "Sarah M.", at(2025, 6, 27, 16, 20), Qris, Refunded, 30_000,
            &[("3", "Matcha Latte", 1, 30_000)]),
        sale("4", "INV-20250627-012", "Alice Brown", "Mike R.", at(2025, 6, 27, 13, 15), Transfer, Canceled, 0,
            &[("4", "Peach Iced Tea", 1, 25_000), ("9", "Mint Tea", 1, 23_000)]),
        sale("5", "INV-20250626-008", "David Lee", "Airlangga W.", at(2025, 6, 26, 11, 30), Cash, Paid, 85_000,
            &[("8", "Lychee Tea", 2, 28_000), ("6", "Jasmine Green Tea", 1, 27_000)]),
    ];

    state.transactions.with_book_mut(|book| {
        for tx in sales {
            book.log.record(tx);
        }
    });
}

// =============================================================================
// Order Queue
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn queued(
    n: u32,
    minute: u32,
    status: OrderStatus,
    priority: OrderPriority,
    employee: Option<&str>,
    estimate: Option<u32>,
    customer: &str,
    total: i64,
    lines: &[(&str, &str, i64, Option<&str>)],
) -> QueueOrder {
    QueueOrder {
        id: n.to_string(),
        order_number: format!("ORD-{:03}", n),
        order_time: at(2025, 6, 28, 14, minute),
        status,
        items: lines
            .iter()
            .map(|&(id, name, quantity, notes)| QueueItem {
                id: id.to_string(),
                name: name.to_string(),
                quantity,
                notes: notes.map(str::to_string),
            })
            .collect(),
        assigned_employee: employee.map(str::to_string),
        estimated_minutes: estimate,
        customer: Some(customer.to_string()),
        total: Money::from_minor(total),
        priority,
    }
}

fn seed_queue(state: &AppState) {
    use OrderPriority::*;
    use OrderStatus::*;

    #[rustfmt::skip]
    let orders = [
        queued(1, 30, Pending, Normal, None, None, "John Doe", 78_000,
            &[("2", "Thai Milk Tea", 2, None), ("1", "Classic Tea", 1, Some("Extra sugar"))]),
        queued(2, 25, Preparing, High, Some("Sarah M."), Some(5), "Jane Smith", 74_000,
            &[("3", "Matcha Latte", 1, None), ("5", "Honey Lemon Tea", 2, None)]),
        queued(3, 20, Ready, Urgent, Some("Mike R."), None, "Bob Wilson", 75_000,
            &[("4", "Peach Iced Tea", 3, None)]),
        queued(4, 15, Served, Normal, Some("Lisa C."), None, "Alice Brown", 48_000,
            &[("6", "Jasmine Green Tea", 1, None), ("7", "Black Tea", 1, None)]),
        queued(5, 10, Pending, Normal, None, None, "David Lee", 79_000,
            &[("8", "Lychee Tea", 2, None), ("9", "Mint Tea", 1, None)]),
        queued(6, 5, Preparing, High, Some("Emma W."), Some(8), "Carol White", 59_000,
            &[("2", "Thai Milk Tea", 1, None), ("3", "Matcha Latte", 1, None)]),
    ];

    state.queue.with_queue_mut(|queue| {
        for order in orders {
            queue.insert(order);
        }
    });
}

// =============================================================================
// Notifications
// =============================================================================

async fn seed_notifications(state: &AppState) {
    let now = demo_now();

    let printer_lost = Notification::new(
        NotificationKind::Error,
        NotificationCategory::System,
        "System Alert",
        "Printer connection lost",
        now - Duration::hours(3),
    );
    let mut new_order = Notification::new(
        NotificationKind::Info,
        NotificationCategory::Order,
        "New Order",
        "Order #ORD-007 received from customer",
        now - Duration::hours(2),
    );
    new_order.is_read = true;

    let mut restocked = Notification::stock_received(
        "Black Tea Leaves",
        Decimal::from(50),
        "kg",
        now - Duration::hours(1),
    );
    restocked.is_read = true;

    let settings = state.settings.snapshot().await.notifications;
    let alerts = state.inventory.with_ledger(|l| {
        low_stock_alerts(&l.snapshot(), &settings, now - Duration::minutes(5))
    });

    state.notifications.with_center_mut(|center| {
        center.push(printer_lost);
        center.push(new_order);
        center.push(restocked);
        center.merge_alerts(alerts);
    });
}
