use serde_json::Value;
use shopai_core::Product;

pub const MISSING_INPUT: &str = "Missing query or products";

/// Validated body of POST /api/recommend
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    pub query: String,
    pub products: Vec<Product>,
}

#[derive(Debug, PartialEq)]
pub enum RequestError {
    // query missing/empty or products not a list
    MissingInput,
    // products is a list but an entry is not a product
    InvalidProduct(String),
}

impl RecommendRequest {
    /// Validate a raw JSON body: `query` must be a non-empty string and
    /// `products` a list of products.
    pub fn from_json(body: Value) -> Result<Self, RequestError> {
        let Value::Object(mut fields) = body else {
            return Err(RequestError::MissingInput);
        };

        let query = match fields.remove("query") {
            Some(Value::String(q)) if !q.is_empty() => q,
            _ => return Err(RequestError::MissingInput),
        };

        let products = match fields.remove("products") {
            Some(list @ Value::Array(_)) => serde_json::from_value::<Vec<Product>>(list)
                .map_err(|e| RequestError::InvalidProduct(e.to_string()))?,
            _ => return Err(RequestError::MissingInput),
        };

        Ok(Self { query, products })
    }
}
