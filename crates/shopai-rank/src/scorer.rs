// Local Scorer - deterministic, LLM-free ranking

// scores products by term overlap with name/brand/category,
// applies the query budget as a hard price ceiling, keeps the top 10

use std::collections::BTreeSet;

use shopai_core::Product;

use crate::query_analyzer::QueryAnalyzer;

/// Fixed result cap for local ranking
pub const MAX_RESULTS: usize = 10;

const SUBSTRING_WEIGHT: u32 = 2;
const CATEGORY_WEIGHT: u32 = 3;
const BRAND_WEIGHT: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: u32,
}

pub struct LocalScorer {
    analyzer: QueryAnalyzer,
}

impl LocalScorer {
    pub fn new() -> Self {
        Self {
            analyzer: QueryAnalyzer::new(),
        }
    }

    /// Relevance of one product against a term set.
    pub fn score(&self, product: &Product, terms: &BTreeSet<String>) -> u32 {
        let haystack = format!(
            "{} {} {}",
            product.name,
            product.brand_str(),
            product.category_str()
        )
        .to_lowercase();
        let category = product.category_str().to_lowercase();
        let brand = product.brand_str().to_lowercase();

        let mut score = 0;
        for term in terms.iter().filter(|t| !t.is_empty()) {
            if haystack.contains(term.as_str()) {
                score += SUBSTRING_WEIGHT;
            }
            if category == *term {
                score += CATEGORY_WEIGHT;
            }
            if brand == *term {
                score += BRAND_WEIGHT;
            }
        }
        score
    }

    /// Budget filter, score, stable sort descending, truncate.
    /// Never fails; an empty result is a valid outcome.
    pub fn rank(&self, query: &str, catalog: &[Product]) -> Vec<ScoredProduct> {
        if catalog.is_empty() {
            return Vec::new();
        }

        let analyzed = self.analyzer.analyze(query);

        let mut ranked: Vec<ScoredProduct> = catalog
            .iter()
            .filter(|p| analyzed.budget.is_none_or(|budget| p.price <= budget))
            .map(|p| ScoredProduct {
                score: self.score(p, &analyzed.terms),
                product: p.clone(),
            })
            .collect();

        // sort_by is stable: equal scores keep catalog order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(MAX_RESULTS);
        ranked
    }

    pub fn recommend(&self, query: &str, catalog: &[Product]) -> Vec<Product> {
        self.rank(query, catalog)
            .into_iter()
            .map(|scored| scored.product)
            .collect()
    }

    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }
}

impl Default for LocalScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank `catalog` against `query` without any LLM involvement.
///
/// Expects already-validated input; an empty query or catalog simply yields
/// catalog order or an empty list.
pub fn local_recommend(query: &str, catalog: &[Product]) -> Vec<Product> {
    LocalScorer::new().recommend(query, catalog)
}
