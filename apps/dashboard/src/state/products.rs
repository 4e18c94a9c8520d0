//! # Product State
//!
//! The catalog is shared by the products page and the order-entry menu, so
//! an item marked out of stock stops selling at once.

use std::sync::{Arc, Mutex, PoisonError};

use melatea_core::products::ProductCatalog;

#[derive(Debug, Default)]
pub struct ProductState {
    catalog: Arc<Mutex<ProductCatalog>>,
}

impl ProductState {
    pub fn new() -> Self {
        ProductState::default()
    }

    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ProductCatalog) -> R,
    {
        let catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        f(&catalog)
    }

    pub fn with_catalog_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ProductCatalog) -> R,
    {
        let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut catalog)
    }
}
