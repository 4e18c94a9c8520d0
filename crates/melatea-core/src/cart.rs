//! # Cart Module
//!
//! The order being built on the order-entry screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Operation               Cart Change           │
//! │  ──────────────           ─────────               ───────────           │
//! │                                                                         │
//! │  Tap menu tile ──────────► add_item() ──────────► qty += 1 or insert   │
//! │                                                                         │
//! │  Tap + / - ──────────────► set_quantity(±1) ────► qty += delta         │
//! │                                                    (qty ≤ 0 removes)   │
//! │                                                                         │
//! │  Tap trash icon ─────────► remove_item() ───────► items.remove(i)      │
//! │                                                                         │
//! │  Payment completed ──────► settle(paid) ────────► paid qty removed     │
//! │                                                    (later adds stay)   │
//! │                                                                         │
//! │  New order ──────────────► clear() ─────────────► items.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_cart_size;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An item in the cart.
///
/// Name and price are frozen when the item is first added, so a menu price
/// change does not alter an order already being rung up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Product id; unique within the cart.
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    /// Always > 0.
    pub quantity: i64,
}

impl CartItem {
    fn from_product(product: &Product) -> Self {
        CartItem {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The cart.
///
/// ## Invariants
/// - Items are unique by product id (adding the same product increases quantity)
/// - Every quantity is > 0
/// - At most [`MAX_CART_ITEMS`] distinct items, each at most [`MAX_ITEM_QUANTITY`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds one unit of a product.
    ///
    /// ## Errors
    /// - `CoreError::QuantityTooLarge` if the item is already at the maximum
    /// - `CoreError::CartTooLarge` if a new item would exceed the item limit
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            let new_qty = item.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        validate_cart_size(self.items.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        self.items.push(CartItem::from_product(product));
        Ok(())
    }

    /// Applies a signed change to an item's quantity.
    ///
    /// A resulting quantity of zero or less removes the item.
    ///
    /// ## Errors
    /// - `CoreError::ItemNotInCart` if the item is not in the cart
    /// - `CoreError::QuantityTooLarge` if the result exceeds the maximum
    pub fn set_quantity(&mut self, item_id: &str, delta: i64) -> CoreResult<()> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotInCart(item_id.to_string()))?;

        let new_qty = self.items[index].quantity.saturating_add(delta);
        if new_qty <= 0 {
            self.items.remove(index);
            return Ok(());
        }

        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items[index].quantity = new_qty;
        Ok(())
    }

    /// Removes an item regardless of its quantity.
    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != item_id);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInCart(item_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Takes a paid order out of the cart.
    ///
    /// Each paid line lowers the matching item by the paid quantity. Items
    /// added while the payment was processing stay in the cart; paid lines
    /// already removed are skipped.
    pub fn settle(&mut self, paid: &Cart) {
        for line in &paid.items {
            if let Some(item) = self.items.iter_mut().find(|i| i.id == line.id) {
                item.quantity -= line.quantity;
            }
        }
        self.items.retain(|i| i.quantity > 0);
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

/// Cart totals summary for the order panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
