//! # Cart Commands
//!
//! The order panel on the dashboard.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu tile click ──► add_to_cart ──► [+]/[-] ──► change_quantity        │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                              quantity reaches 0 ──► item removed        │
//! │                                                                         │
//! │  out-of-stock product ──► add_to_cart refused (CART_ERROR)              │
//! │                                                                         │
//! │  complete_payment ──► paid lines removed  clear_cart ──► cart cleared   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use melatea_core::cart::{Cart, CartItem, CartTotals};
use melatea_core::products::CatalogProduct;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: cart.totals(),
        }
    }
}

/// The tea menu in catalog order. Out-of-stock products are included so
/// the tile can be greyed out.
pub fn get_menu(state: &AppState) -> Result<Vec<CatalogProduct>, ApiError> {
    state.auth.require_login()?;
    Ok(state.products.with_catalog(|c| c.products().to_vec()))
}

/// Gets the current cart contents.
pub fn get_cart(state: &AppState) -> Result<CartResponse, ApiError> {
    state.auth.require_login()?;
    debug!("get_cart command");
    Ok(state.cart.with_cart(|c| CartResponse::from(c)))
}

/// Adds one of a menu item, or bumps its quantity if already in the cart.
pub fn add_to_cart(state: &AppState, product_id: &str) -> Result<CartResponse, ApiError> {
    state.auth.require_login()?;
    debug!(product_id = %product_id, "add_to_cart command");

    let product = state
        .products
        .with_catalog(|c| c.sellable(product_id))
        .map_err(|e| {
            warn!(product_id = %product_id, error = %e, "Product not sellable");
            ApiError::from(e)
        })?;

    state.cart.with_cart_mut(|c| {
        c.add_item(&product)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Changes an item's quantity by `delta`. Reaching zero removes it.
pub fn change_quantity(
    state: &AppState,
    product_id: &str,
    delta: i64,
) -> Result<CartResponse, ApiError> {
    state.auth.require_login()?;
    debug!(product_id = %product_id, delta = %delta, "change_quantity command");

    state.cart.with_cart_mut(|c| {
        c.set_quantity(product_id, delta)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Removes an item from the cart.
pub fn remove_from_cart(state: &AppState, product_id: &str) -> Result<CartResponse, ApiError> {
    state.auth.require_login()?;
    debug!(product_id = %product_id, "remove_from_cart command");

    state.cart.with_cart_mut(|c| {
        c.remove_item(product_id)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Clears all items from the cart.
pub fn clear_cart(state: &AppState) -> Result<CartResponse, ApiError> {
    state.auth.require_login()?;
    debug!("clear_cart command");

    Ok(state.cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    }))
}
