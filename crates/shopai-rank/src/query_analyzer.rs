// Query Analyzer - extracts search terms and a price ceiling from free-text shopping queries

use std::collections::BTreeSet;

use regex::Regex;

/// Synonym table: when any trigger term is present, the listed terms are added.
/// Applied once against the raw terms; added terms never re-trigger a rule.
const SYNONYMS: &[(&[&str], &[&str])] = &[
    (&["iphone"], &["apple", "phone"]),
    (&["earbuds", "earbud"], &["headphones"]),
    (&["tv"], &["television"]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedQuery {
    pub original: String,
    /// Lowercase alphanumeric tokens, closed under the synonym table
    pub terms: BTreeSet<String>,
    /// Maximum acceptable price, if the query names one
    pub budget: Option<f64>,
}

pub struct QueryAnalyzer {
    strip_pattern: Regex,
    budget_pattern: Regex,
}

impl QueryAnalyzer {
    pub fn new() -> Self {
        // anything that is not a lowercase ascii letter, digit or whitespace
        let strip_pattern = Regex::new(r"[^a-z0-9\s]").expect("valid strip pattern");

        // first standalone run of 2-5 ascii digits; neighbours must be non-word chars or edges
        let budget_pattern = Regex::new(r"(?:^|[^A-Za-z0-9_])([0-9]{2,5})(?:$|[^A-Za-z0-9_])")
            .expect("valid budget pattern");

        Self {
            strip_pattern,
            budget_pattern,
        }
    }

    pub fn analyze(&self, query: &str) -> AnalyzedQuery {
        AnalyzedQuery {
            original: query.to_string(),
            terms: self.extract_terms(query),
            budget: self.extract_budget(query),
        }
    }

    /// Lowercase, blank out punctuation, split on whitespace, dedup, expand synonyms.
    pub fn extract_terms(&self, query: &str) -> BTreeSet<String> {
        let lowered = query.to_lowercase();
        let cleaned = self.strip_pattern.replace_all(&lowered, " ");

        let raw: BTreeSet<String> = cleaned.split_whitespace().map(str::to_string).collect();

        let mut terms = raw.clone();
        for (triggers, additions) in SYNONYMS {
            if triggers.iter().any(|t| raw.contains(*t)) {
                terms.extend(additions.iter().map(|a| a.to_string()));
            }
        }
        terms
    }

    /// Budget comes from the raw, unlowered query; only the first qualifying run counts.
    pub fn extract_budget(&self, query: &str) -> Option<f64> {
        let caps = self.budget_pattern.captures(query)?;
        let digits = caps.get(1)?.as_str();
        digits.parse::<u32>().ok().map(f64::from)
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
