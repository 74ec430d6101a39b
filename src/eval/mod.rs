//! Product filtering and sorting.
//!
//! Pure evaluation of a [`FilterState`] against a product list. The rules:
//!
//! - filters of the same category are alternatives (OR);
//! - categories are requirements (AND);
//! - each availability toggle is its own requirement, so `instock` and
//!   `returnable` together demand both;
//! - a range filter matches when the product's numeric field lies in the
//!   interval, bounds included;
//! - a search query matches when every whitespace-separated token fuzzy
//!   matches the product name.
//!
//! Sorting is stable; `featured` keeps the input order.

use crate::domain::{ActiveFilter, AvailabilityToggle, Category, FilterState, FilterValue, Product, SortOption};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;
use std::collections::BTreeMap;

/// Products that survived filtering, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Matching products, sorted.
    pub products: Vec<Product>,
    /// Number of matching products.
    pub match_count: usize,
}

/// Key under which predicates are OR-ed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PredicateGroup {
    Category(Category),
    Toggle(AvailabilityToggle),
}

impl PredicateGroup {
    fn of(filter: &ActiveFilter) -> Self {
        match filter.value {
            FilterValue::Toggle { toggle } => Self::Toggle(toggle),
            _ => Self::Category(filter.category),
        }
    }
}

/// Returns true when `product` satisfies a single filter.
#[must_use]
pub fn matches_filter(product: &Product, filter: &ActiveFilter) -> bool {
    match &filter.value {
        FilterValue::Checkbox { value } | FilterValue::Radio { value, .. } => {
            product.matches_text(filter.category, value)
        }
        FilterValue::Toggle { toggle } => product.satisfies(*toggle),
        FilterValue::Range { bounds } => product
            .numeric_field(filter.category)
            .is_some_and(|v| bounds.contains(v)),
    }
}

/// Filters and sorts `products` according to `state`.
///
/// ```
/// use storefront_filters::domain::{ActiveFilter, Category, FilterState, Product};
/// use storefront_filters::eval::evaluate;
///
/// let products: Vec<Product> = serde_json::from_str(r#"[
///     {"id":"1","name":"Cola Zero","price":1.2,"type":"Soda","size":"0.33L","brand":"Cola","inStock":true},
///     {"id":"2","name":"Lemon Fizz","price":1.4,"type":"Soda","size":"0.33L","brand":"Sprite","inStock":true}
/// ]"#).unwrap();
///
/// let mut state = FilterState::default();
/// let cola = ActiveFilter::checkbox(Category::Brand, "Cola", "Cola");
/// state.active_filters.insert(cola.id.clone(), cola);
///
/// let result = evaluate(&products, &state);
/// assert_eq!(result.match_count, 1);
/// assert_eq!(result.products[0].id, "1");
/// ```
#[must_use]
pub fn evaluate(products: &[Product], state: &FilterState) -> Evaluation {
    let _span = tracing::debug_span!(
        "evaluate",
        total_products = products.len(),
        filter_count = state.active_filters.len(),
        sort = %state.sort
    )
    .entered();

    let mut groups: BTreeMap<PredicateGroup, Vec<&ActiveFilter>> = BTreeMap::new();
    for filter in state.filters() {
        groups.entry(PredicateGroup::of(filter)).or_default().push(filter);
    }

    let tokens: Vec<String> = state
        .search_query
        .as_deref()
        .map(|q| q.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default();

    let matcher = if tokens.is_empty() {
        None
    } else {
        Some(SkimMatcherV2::default())
    };

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|product| {
            groups
                .values()
                .all(|alternatives| alternatives.iter().any(|f| matches_filter(product, f)))
        })
        .filter(|product| {
            matcher.as_ref().map_or(true, |m| {
                let name_lower = product.name.to_lowercase();
                tokens.iter().all(|token| m.fuzzy_match(&name_lower, token).is_some())
            })
        })
        .cloned()
        .collect();

    sort_products(&mut matched, state.sort);

    tracing::debug!(match_count = matched.len(), "products evaluated");

    Evaluation {
        match_count: matched.len(),
        products: matched,
    }
}

/// Filters and sorts `products`, discarding the count.
#[must_use]
pub fn apply(products: &[Product], state: &FilterState) -> Vec<Product> {
    evaluate(products, state).products
}

/// Sorts products in place; stable for equal keys.
pub fn sort_products(products: &mut [Product], sort: SortOption) {
    match sort {
        SortOption::Featured => {}
        SortOption::PriceLow => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOption::PriceHigh => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOption::Newest => products.sort_by(|a, b| b.cmp_recency(a)),
    }
}
