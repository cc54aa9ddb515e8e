//! Property tests for the local scorer and the fallback policy.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use shopai_core::Product;
use shopai_rank::{
    local_recommend, LlmClient, LlmError, LocalScorer, QueryAnalyzer, Recommender, MAX_RESULTS,
};

struct AlwaysFails;

#[async_trait]
impl LlmClient for AlwaysFails {
    async fn generate(&self, _prompt: &str, _model: Option<&str>) -> Result<String, LlmError> {
        Err(LlmError::RequestFailed("connection reset".to_string()))
    }

    fn model(&self) -> &str {
        "none"
    }

    fn provider(&self) -> &str {
        "broken"
    }
}

fn product_strategy() -> impl Strategy<Value = Product> {
    (
        0i64..1000,
        "[A-Za-z0-9 ]{1,20}",
        0u32..2000,
        proptest::option::of(prop_oneof![
            Just("smartphones"),
            Just("laptops"),
            Just("headphones"),
            Just("television"),
        ]),
        proptest::option::of(prop_oneof![Just("Apple"), Just("Sony"), Just("Dell")]),
    )
        .prop_map(|(id, name, price, category, brand)| {
            let mut product = Product::new(id, name, f64::from(price));
            product.category = category.map(str::to_string);
            product.brand = brand.map(str::to_string);
            product
        })
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Product>> {
    proptest::collection::vec(product_strategy(), 0..25)
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z ]{0,30}",
        "(cheap |new )?(iphone|laptop|tv|earbuds|sony|apple)( under [0-9]{2,4})?",
    ]
}

proptest! {
    #[test]
    fn empty_query_is_catalog_prefix(catalog in catalog_strategy()) {
        let result = local_recommend("", &catalog);
        let expected: Vec<Product> = catalog.iter().take(MAX_RESULTS).cloned().collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn three_digit_budget_is_extracted(
        n in 100u32..1000,
        before in "[a-z ]{0,10}",
        after in "[a-z ]{0,10}",
    ) {
        let query = format!("{before} {n} {after}");
        prop_assert_eq!(QueryAnalyzer::new().extract_budget(&query), Some(f64::from(n)));
    }

    #[test]
    fn results_respect_budget_and_cap(query in query_strategy(), catalog in catalog_strategy()) {
        let analyzer = QueryAnalyzer::new();
        let result = local_recommend(&query, &catalog);

        prop_assert!(result.len() <= MAX_RESULTS);
        if let Some(budget) = analyzer.extract_budget(&query) {
            prop_assert!(result.iter().all(|p| p.price <= budget));
        }
        // never invents products
        prop_assert!(result.iter().all(|p| catalog.contains(p)));
    }

    #[test]
    fn scores_are_non_increasing(query in query_strategy(), catalog in catalog_strategy()) {
        let ranked = LocalScorer::new().rank(&query, &catalog);
        prop_assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn name_term_adds_at_least_two(
        product in product_strategy(),
        word in "[a-z]{3,8}",
    ) {
        prop_assume!(word != "zzzq");
        let scorer = LocalScorer::new();
        let mut named = product.clone();
        named.name = format!("{} {}", product.name, word);

        let base: BTreeSet<String> = ["zzzq".to_string()].into_iter().collect();
        let mut extended = base.clone();
        extended.insert(word.clone());

        let before = scorer.score(&named, &base);
        let after = scorer.score(&named, &extended);
        prop_assert!(after >= before + 2);
    }

    #[test]
    fn failing_llm_equals_local(query in query_strategy(), catalog in catalog_strategy()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let engine = Recommender::with_client(Arc::new(AlwaysFails));
        let result = runtime.block_on(engine.recommend(&query, &catalog));
        prop_assert_eq!(result.products, local_recommend(&query, &catalog));
    }
}

#[test]
fn fifteen_matching_products_truncate_to_ten() {
    let catalog: Vec<Product> = (1..=15)
        .map(|i| Product::new(i, format!("Laptop {i}"), 500.0).with_category("laptops"))
        .collect();
    let result = local_recommend("laptop", &catalog);
    assert_eq!(result.len(), 10);
}
