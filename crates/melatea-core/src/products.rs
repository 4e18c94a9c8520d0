//! # Products Module
//!
//! The product catalog behind the products page and the order-entry menu.
//!
//! ## Catalog Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products page                          order-entry screen              │
//! │  ─────────────                          ──────────────────              │
//! │  add / update / delete ──► ProductCatalog ──► sellable(id) ──► Cart     │
//! │                                 │                │                      │
//! │  ProductFilter ─► ProductSort ──┘                └── out of stock?      │
//! │       │                                              ProductUnavailable │
//! │       └──► paginate(page, 8)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, SortDirection};
use crate::validation::{validate_name, validate_required};

/// Cards per page on the products page.
pub const PRODUCTS_PAGE_SIZE: usize = 8;

// =============================================================================
// Category & Availability
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ProductCategory {
    #[default]
    #[serde(rename = "Hot Tea")]
    HotTea,
    #[serde(rename = "Milk Tea")]
    MilkTea,
    Specialty,
    #[serde(rename = "Iced Tea")]
    IcedTea,
    #[serde(rename = "Green Tea")]
    GreenTea,
    #[serde(rename = "Fruit Tea")]
    FruitTea,
    #[serde(rename = "Herbal Tea")]
    HerbalTea,
}

impl ProductCategory {
    /// Category dropdown order.
    pub const ALL: [ProductCategory; 7] = [
        ProductCategory::HotTea,
        ProductCategory::MilkTea,
        ProductCategory::Specialty,
        ProductCategory::IcedTea,
        ProductCategory::GreenTea,
        ProductCategory::FruitTea,
        ProductCategory::HerbalTea,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            ProductCategory::HotTea => "Hot Tea",
            ProductCategory::MilkTea => "Milk Tea",
            ProductCategory::Specialty => "Specialty",
            ProductCategory::IcedTea => "Iced Tea",
            ProductCategory::GreenTea => "Green Tea",
            ProductCategory::FruitTea => "Fruit Tea",
            ProductCategory::HerbalTea => "Herbal Tea",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    #[default]
    Available,
    OutOfStock,
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A product as managed on the products page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    /// Emoji shown on the menu tile and product card.
    pub icon: String,
    pub category: ProductCategory,
    pub availability: Availability,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CatalogProduct {
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }

    /// The part of the product a cart line needs.
    pub fn menu_item(&self) -> Product {
        Product::new(self.id.clone(), self.name.clone(), self.price).with_icon(self.icon.clone())
    }
}

/// What the add/edit product form submits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: ProductCategory,
    #[serde(default)]
    pub availability: Availability,
}

impl ProductForm {
    /// Checks the form and returns the trimmed name and description.
    ///
    /// ## Rules
    /// - Name and description are required
    /// - Price must be greater than zero
    fn validate(&self) -> CoreResult<(String, String)> {
        let name = validate_name("product name", &self.name)?;
        let description = validate_required("description", &self.description)?;

        if !self.price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "price".to_string(),
            }
            .into());
        }

        Ok((name, description))
    }
}

// =============================================================================
// Filter & Sort
// =============================================================================

/// Filters for the products page. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductFilter {
    /// Matched case-insensitively against the product name.
    pub search: String,
    pub category: Option<ProductCategory>,
    pub availability: Option<Availability>,
}

impl ProductFilter {
    pub fn matches(&self, product: &CatalogProduct) -> bool {
        let needle = self.search.trim().to_lowercase();

        (needle.is_empty() || product.name.to_lowercase().contains(&needle))
            && self.category.map_or(true, |c| product.category == c)
            && self.availability.map_or(true, |a| product.availability == a)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortField {
    #[default]
    Name,
    Price,
    UpdatedAt,
}

/// Column and direction. Defaults to name A-Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

impl Default for ProductSort {
    fn default() -> Self {
        ProductSort {
            field: ProductSortField::Name,
            direction: SortDirection::Asc,
        }
    }
}

impl ProductSort {
    /// Same field flips direction, a new field starts ascending.
    pub fn clicked(self, field: ProductSortField) -> Self {
        let direction = if self.field == field {
            self.direction.toggled()
        } else {
            SortDirection::Asc
        };
        ProductSort { field, direction }
    }

    fn compare(&self, a: &CatalogProduct, b: &CatalogProduct) -> Ordering {
        let ordering = match self.field {
            ProductSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            ProductSortField::Price => a.price.cmp(&b.price),
            ProductSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn sort(&self, products: &mut [CatalogProduct]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// All products, in insertion order.
///
/// ## Invariants
/// - Ids are unique
/// - `created_at` never changes after insertion
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<CatalogProduct>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        ProductCatalog::default()
    }

    /// Inserts an existing product record as-is (seed data).
    pub fn insert(&mut self, product: CatalogProduct) {
        self.products.push(product);
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Menu item for a product that can be rung up.
    ///
    /// ## Errors
    /// - `CoreError::ProductNotFound` for an unknown id
    /// - `CoreError::ProductUnavailable` when the product is out of stock
    pub fn sellable(&self, id: &str) -> CoreResult<Product> {
        let product = self
            .get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        if !product.is_available() {
            return Err(CoreError::ProductUnavailable(product.name.clone()));
        }
        Ok(product.menu_item())
    }

    /// Adds a product. Ids are numeric strings following the highest one.
    pub fn add(&mut self, form: ProductForm, at: DateTime<Utc>) -> CoreResult<CatalogProduct> {
        let (name, description) = form.validate()?;

        let product = CatalogProduct {
            id: self.next_id(),
            name,
            description,
            price: form.price,
            icon: form.icon,
            category: form.category,
            availability: form.availability,
            created_at: at,
            updated_at: at,
        };
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replaces the editable fields and stamps `updated_at`.
    pub fn update(
        &mut self,
        id: &str,
        form: ProductForm,
        at: DateTime<Utc>,
    ) -> CoreResult<CatalogProduct> {
        let (name, description) = form.validate()?;
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        product.name = name;
        product.description = description;
        product.price = form.price;
        product.icon = form.icon;
        product.category = form.category;
        product.availability = form.availability;
        product.updated_at = at;
        Ok(product.clone())
    }

    pub fn delete(&mut self, id: &str) -> CoreResult<CatalogProduct> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        Ok(self.products.remove(index))
    }

    /// Matching products in sort order.
    pub fn list(&self, filter: &ProductFilter, sort: ProductSort) -> Vec<CatalogProduct> {
        let mut products: Vec<_> = self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        sort.sort(&mut products);
        products
    }

    fn next_id(&self) -> String {
        let highest = self
            .products
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (highest + 1).to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
