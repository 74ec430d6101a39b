//! Encoding and decoding between [`FilterState`] and [`QueryString`].
//!
//! Both directions are pure. Encoding omits every default (featured sort, no
//! filters, no search) and emits keys in a fixed order with sorted values, so
//! a given state always produces the same query. Decoding never fails:
//! unknown keys, unknown sort values and malformed ranges are ignored, and
//! values missing from the catalog are kept with their raw text as label.
//!
//! `decode(catalog, &encode(state)) == state` holds for every state reachable
//! through the store.

use super::QueryString;
use crate::catalog::Catalog;
use crate::domain::{
    AvailabilityToggle, Bounds, Category, FilterState, FilterValue, Kind, SortOption,
};
use url::form_urlencoded;

/// Categories with their own URL key, in emission order.
const KEYED_CATEGORIES: [Category; 5] = [
    Category::Type,
    Category::Package,
    Category::Size,
    Category::Brand,
    Category::Price,
];

const SORT_KEY: &str = "sort";
const SEARCH_KEY: &str = "q";
const TOGGLE_ON: &str = "true";

/// Serializes a filter state into a minimal, deterministic query string.
///
/// ```
/// use storefront_filters::domain::{ActiveFilter, Category, FilterState, SortOption};
/// use storefront_filters::query::encode;
///
/// let mut state = FilterState::default();
/// assert!(encode(&state).is_empty());
///
/// for brand in ["Sprite", "Cola"] {
///     let filter = ActiveFilter::checkbox(Category::Brand, brand, brand);
///     state.active_filters.insert(filter.id.clone(), filter);
/// }
/// state.sort = SortOption::PriceLow;
/// assert_eq!(encode(&state).as_str(), "brand=Cola&brand=Sprite&sort=price-low");
/// ```
#[must_use]
pub fn encode(state: &FilterState) -> QueryString {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for category in KEYED_CATEGORIES {
        let mut values: Vec<String> = Vec::new();
        let mut ranges: Vec<String> = Vec::new();

        for filter in state.filters().filter(|f| f.category == category) {
            match &filter.value {
                FilterValue::Checkbox { value } | FilterValue::Radio { value, .. } => {
                    values.push(value.clone());
                }
                FilterValue::Range { bounds } => ranges.push(format_bounds(*bounds)),
                FilterValue::Toggle { .. } => {}
            }
        }

        values.sort_unstable();
        values.dedup();
        for value in values.iter().chain(ranges.iter()) {
            serializer.append_pair(category.as_str(), value);
        }
    }

    for toggle in AvailabilityToggle::ALL {
        let on = state
            .filters()
            .any(|f| matches!(f.value, FilterValue::Toggle { toggle: t } if t == toggle));
        if on {
            serializer.append_pair(toggle.query_key(), TOGGLE_ON);
        }
    }

    if state.sort != SortOption::Featured {
        serializer.append_pair(SORT_KEY, state.sort.as_str());
    }

    if let Some(query) = &state.search_query {
        serializer.append_pair(SEARCH_KEY, query);
    }

    QueryString(serializer.finish())
}

/// Reconstructs a filter state from a query string.
///
/// Labels, kinds and range bounds come from `catalog`. For radio categories
/// only the last value of a group survives.
///
/// ```
/// use storefront_filters::query::{decode, QueryString};
/// use storefront_filters::{Catalog, domain::SortOption};
///
/// let catalog = Catalog::default();
/// let state = decode(&catalog, &QueryString::new("brand=Cola&sort=cheapest&utm_source=mail"));
/// assert_eq!(state.active_filters.len(), 1);
/// assert_eq!(state.sort, SortOption::Featured);
/// ```
#[must_use]
pub fn decode(catalog: &Catalog, query: &QueryString) -> FilterState {
    let _span = tracing::debug_span!("decode_query", query = %query).entered();

    let mut state = FilterState::default();

    for (key, value) in query.pairs() {
        let value = value.trim();

        match key.as_ref() {
            SORT_KEY => {
                state.sort = SortOption::parse(value).unwrap_or_else(|| {
                    tracing::debug!(sort = %value, "unknown sort value, using featured");
                    SortOption::Featured
                });
            }
            SEARCH_KEY => {
                state.search_query = FilterState::normalize_search(Some(value));
            }
            key => {
                if let Some(toggle) = AvailabilityToggle::from_query_key(key) {
                    if value.eq_ignore_ascii_case(TOGGLE_ON) {
                        let filter = catalog.toggle_option(toggle).to_active();
                        state.active_filters.insert(filter.id.clone(), filter);
                    }
                    continue;
                }

                match Category::parse(key).filter(|c| KEYED_CATEGORIES.contains(c)) {
                    Some(category) => decode_category_value(catalog, &mut state, category, value),
                    None => tracing::trace!(key = %key, "ignoring unknown query key"),
                }
            }
        }
    }

    tracing::debug!(
        filter_count = state.active_filters.len(),
        sort = %state.sort,
        has_search = state.search_query.is_some(),
        "query decoded"
    );

    state
}

fn decode_category_value(catalog: &Catalog, state: &mut FilterState, category: Category, value: &str) {
    match catalog.kind_for(category) {
        Kind::Range => {
            let Some(option) = catalog.range_option(category) else {
                tracing::debug!(category = %category, "no range option declared, ignoring");
                return;
            };
            let (Some(declared), Some(requested)) = (option.bounds(), parse_bounds(value)) else {
                tracing::debug!(category = %category, value = %value, "malformed range, ignoring");
                return;
            };
            let selected = requested.clamp_within(declared);
            let mut filter = option.to_active();
            filter.value = FilterValue::Range { bounds: selected };
            filter.display_value = Some(catalog.format_range(selected, declared));
            state.active_filters.insert(filter.id.clone(), filter);
        }
        Kind::Checkbox | Kind::Radio => {
            if crate::domain::filter::normalize_value(value).is_empty() {
                return;
            }
            let filter = catalog.text_filter(category, value);
            if let Some(group) = filter.group() {
                state.active_filters.retain(|_, f| f.group() != Some(group));
            }
            state.active_filters.entry(filter.id.clone()).or_insert(filter);
        }
        Kind::Toggle => {
            tracing::trace!(category = %category, "toggle categories have no value key");
        }
    }
}

/// Formats bounds as `<min>-<max>` using the shortest exact decimal form.
fn format_bounds(bounds: Bounds) -> String {
    format!("{}-{}", bounds.min, bounds.max)
}

/// Parses `<min>-<max>`; a leading `-` on either end is a sign.
fn parse_bounds(value: &str) -> Option<Bounds> {
    let split = value.get(1..)?.find('-')? + 1;
    let (min, max) = (&value[..split], &value[split + 1..]);
    let min = min.trim().parse::<f64>().ok()?;
    let max = max.trim().parse::<f64>().ok()?;
    Some(Bounds::new(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActiveFilter;

    #[test]
    fn empty_state_encodes_to_empty_query() {
        assert!(encode(&FilterState::default()).is_empty());
    }

    #[test]
    fn keys_follow_fixed_order() {
        let catalog = Catalog::default();
        let query = QueryString::new("q=lemon&sort=newest&instock=true&brand=Sprite&type=Soda&size=0.5L");
        let state = decode(&catalog, &query);
        assert_eq!(
            encode(&state).as_str(),
            "type=Soda&size=0.5L&brand=Sprite&instock=true&sort=newest&q=lemon"
        );
    }

    #[test]
    fn toggles_only_accept_true() {
        let catalog = Catalog::default();
        let state = decode(&catalog, &QueryString::new("instock=false&returnable=true"));
        assert!(!state.is_active("availability-instock"));
        assert!(state.is_active("availability-returnable"));
    }

    #[test]
    fn radio_keeps_last_value() {
        let catalog = Catalog::default();
        let state = decode(&catalog, &QueryString::new("package=Can&package=Glass"));
        let packages = state.by_category(Category::Package);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].label, "Glass bottle");
    }

    #[test]
    fn price_range_is_clamped_and_labelled() {
        let catalog = Catalog::default();
        let state = decode(&catalog, &QueryString::new("price=-5-1000"));
        let price = &state.active_filters["price-range"];
        assert_eq!(price.value, FilterValue::Range { bounds: Bounds::new(0.0, 50.0) });
        assert_eq!(price.display_value.as_deref(), Some("€0 - €50+"));
        assert_eq!(encode(&state).as_str(), "price=0-50");
    }

    #[test]
    fn malformed_values_are_ignored() {
        let catalog = Catalog::default();
        let state = decode(&catalog, &QueryString::new("price=cheap&brand=&brand=%21%21&q=%20%20"));
        assert!(state.is_default());
    }

    #[test]
    fn bounds_parse_handles_signs() {
        assert_eq!(parse_bounds("10-50"), Some(Bounds::new(10.0, 50.0)));
        assert_eq!(parse_bounds("-5--1"), Some(Bounds::new(-5.0, -1.0)));
        assert_eq!(parse_bounds("2.5-7.25"), Some(Bounds::new(2.5, 7.25)));
        assert_eq!(parse_bounds("10"), None);
        assert_eq!(parse_bounds(""), None);
    }

    #[test]
    fn search_text_is_percent_encoded() {
        let mut state = FilterState::default();
        state.search_query = Some("ginger ale & lime".to_string());
        let query = encode(&state);
        assert_eq!(query.as_str(), "q=ginger+ale+%26+lime");
        assert_eq!(decode(&Catalog::default(), &query), state);
    }

    #[test]
    fn unknown_brand_round_trips_with_raw_label() {
        let catalog = Catalog::default();
        let mut state = FilterState::default();
        let filter = ActiveFilter::checkbox(Category::Brand, "Club-Mate", "Club-Mate");
        state.active_filters.insert(filter.id.clone(), filter);
        assert_eq!(decode(&catalog, &encode(&state)), state);
    }
}
