//! Core types for the product recommendation system
//! this crate contains the shared data structures used across all components.
pub mod catalog;

pub use catalog::{load_catalog, parse_catalog, CatalogError};

use serde::{Deserialize, Serialize};

// PRODUCT //

/// A single product as supplied by the caller.
///
/// `category` and `brand` are explicit options: the scorer treats a missing
/// value as the empty string. Any other descriptive fields (description,
/// rating, image, ...) land in `extra` and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64, // stable identity, unique within a catalog

    pub name: String,

    pub price: f64, // non-negative

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: None,
            brand: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Attach a descriptive field the ranking code never reads
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Category, or "" when absent
    pub fn category_str(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Brand, or "" when absent
    pub fn brand_str(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }
}

// CATALOG //

/// Ordered sequence of products, not sorted or deduplicated; may be empty
pub type Catalog = Vec<Product>;
