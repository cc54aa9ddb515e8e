// Prompt building and LLM response parsing for the ranking path

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use shopai_core::Product;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit pattern"));

/// Prompt carrying the verbatim query and the full serialized catalog.
pub fn build_prompt(query: &str, catalog: &[Product]) -> Result<String, serde_json::Error> {
    let products = serde_json::to_string(catalog)?;
    Ok(format!(
        r#"## USER QUERY
"{query}"

## AVAILABLE PRODUCTS
{products}

## INSTRUCTIONS
- Pick the products that best match the query, respecting any budget, category or brand it mentions.
- Only use IDs that appear in the list above.
- Limit the answer to 3-5 IDs.
- Reply with ONLY a JSON array of product IDs, for example: [2, 5, 9]"#
    ))
}

/// Product ids named by an LLM response.
///
/// The whole response is first parsed as JSON: an array yields its integer
/// elements, any other JSON value yields nothing. Text that is not JSON at all
/// is scanned for digit runs instead.
pub fn parse_product_ids(response: &str) -> Vec<i64> {
    match serde_json::from_str::<Value>(response) {
        Ok(Value::Array(items)) => items.iter().filter_map(json_id).collect(),
        Ok(_) => Vec::new(),
        Err(_) => DIGIT_RUN
            .find_iter(response)
            .filter_map(|m| m.as_str().parse::<i64>().ok())
            .collect(),
    }
}

fn json_id(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Catalog entries whose id was returned, in catalog order.
pub fn select_products(catalog: &[Product], ids: &[i64]) -> Vec<Product> {
    let wanted: HashSet<i64> = ids.iter().copied().collect();
    catalog
        .iter()
        .filter(|p| wanted.contains(&p.id))
        .cloned()
        .collect()
}
