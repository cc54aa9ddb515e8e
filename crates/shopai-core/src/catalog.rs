//! Catalog loading from JSON files

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::{Catalog, Product};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Product {id} has invalid price {price}")]
    InvalidPrice { id: i64, price: f64 },
}

/// Parse a JSON array of products.
///
/// Prices must be finite and non-negative; everything else is accepted as-is
/// (duplicates and ordering are the caller's business).
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let products: Vec<Product> = serde_json::from_str(json)?;

    if let Some(bad) = products
        .iter()
        .find(|p| !p.price.is_finite() || p.price < 0.0)
    {
        return Err(CatalogError::InvalidPrice {
            id: bad.id,
            price: bad.price,
        });
    }
    Ok(products)
}

// Load a catalog from a JSON file on disk
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path)?;
    parse_catalog(&content)
}
