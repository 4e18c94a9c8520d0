//! # Product Commands
//!
//! Products page: browse, add, edit, delete. Availability set here decides
//! what the order-entry screen can sell.

use chrono::Utc;
use melatea_core::products::{
    CatalogProduct, ProductCategory, ProductFilter, ProductForm, ProductSort, PRODUCTS_PAGE_SIZE,
};
use melatea_core::query::{paginate, Page};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Products page request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: ProductSort,
    /// 1-based.
    pub page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPage {
    pub categories: Vec<ProductCategory>,
    pub products: Page<CatalogProduct>,
}

pub fn list_products(state: &AppState, query: &ProductQuery) -> Result<ProductsPage, ApiError> {
    state.auth.require_login()?;
    debug!(
        search = %query.filter.search,
        sort = ?query.sort.field,
        page = query.page,
        "list_products command"
    );

    let found = state
        .products
        .with_catalog(|c| c.list(&query.filter, query.sort));

    Ok(ProductsPage {
        categories: ProductCategory::ALL.to_vec(),
        products: paginate(found, query.page, PRODUCTS_PAGE_SIZE),
    })
}

pub fn get_product(state: &AppState, id: &str) -> Result<CatalogProduct, ApiError> {
    state.auth.require_login()?;
    debug!(product_id = %id, "get_product command");

    state
        .products
        .with_catalog(|c| c.get(id).cloned())
        .ok_or_else(|| ApiError::not_found("Product", id))
}

pub fn add_product(state: &AppState, form: ProductForm) -> Result<CatalogProduct, ApiError> {
    state.auth.require_login()?;
    debug!(name = %form.name, "add_product command");

    let product = state
        .products
        .with_catalog_mut(|c| c.add(form, Utc::now()))
        .map_err(|e| {
            warn!(error = %e, "Product rejected");
            ApiError::from(e)
        })?;

    info!(product_id = %product.id, name = %product.name, price = %product.price, "Product added");
    Ok(product)
}

pub fn update_product(
    state: &AppState,
    id: &str,
    form: ProductForm,
) -> Result<CatalogProduct, ApiError> {
    state.auth.require_login()?;
    debug!(product_id = %id, "update_product command");

    let product = state
        .products
        .with_catalog_mut(|c| c.update(id, form, Utc::now()))
        .map_err(|e| {
            warn!(product_id = %id, error = %e, "Product update rejected");
            ApiError::from(e)
        })?;

    info!(
        product_id = %product.id,
        availability = ?product.availability,
        "Product updated"
    );
    Ok(product)
}

/// Removes a product. Carts already holding it keep their line.
pub fn delete_product(state: &AppState, id: &str) -> Result<CatalogProduct, ApiError> {
    state.auth.require_login()?;
    debug!(product_id = %id, "delete_product command");

    let removed = state.products.with_catalog_mut(|c| c.delete(id))?;

    info!(product_id = %removed.id, name = %removed.name, "Product deleted");
    Ok(removed)
}
