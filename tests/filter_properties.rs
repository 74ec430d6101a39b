//! Behavioural properties of the store, codec and evaluator.

use std::sync::Arc;
use storefront_filters::app::FilterStore;
use storefront_filters::domain::{ActiveFilter, Bounds, Category, FilterValue, Product, SortOption};
use storefront_filters::eval::{apply, evaluate, sort_products};
use storefront_filters::query::{decode, encode};
use storefront_filters::Catalog;

fn beverages() -> Arc<Catalog> {
    Arc::new(Catalog::default())
}

fn product(id: &str, brand: &str, product_type: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("{brand} {product_type}"),
        price,
        product_type: product_type.to_string(),
        size: "0.33L".to_string(),
        brand: brand.to_string(),
        package: Some("Bottle".to_string()),
        in_stock: true,
        returnable: false,
        created_at: None,
    }
}

fn brand(value: &str) -> ActiveFilter {
    ActiveFilter::checkbox(Category::Brand, value, value)
}

#[test]
fn encode_decode_round_trips_reachable_states() {
    let catalog = beverages();
    let mut store = FilterStore::new(Arc::clone(&catalog));

    let check = |store: &FilterStore| {
        let restored = decode(&catalog, &encode(store.state()));
        assert_eq!(&restored, store.state(), "query: {}", encode(store.state()));
    };

    check(&store);
    store.add(brand("Sprite"));
    store.add(brand("Club-Mate"));
    check(&store);
    store.select("package", "package-glass");
    store.set_toggle("availability-returnable", true);
    check(&store);
    store.set_range("price-range", 1.5, 7.25);
    store.set_sort(SortOption::PriceHigh);
    check(&store);
    store.set_search(Some("zero sugar & lime"));
    store.add(ActiveFilter::checkbox(Category::Size, "0.5L", "0.5 L"));
    check(&store);
    store.clear_category(Category::Brand);
    check(&store);
}

#[test]
fn round_trip_holds_for_loosely_spelled_gestures() {
    let catalog = beverages();
    let mut store = FilterStore::new(Arc::clone(&catalog));

    store.add(brand("sprite"));
    store.add(ActiveFilter::checkbox(Category::Size, "0.5 l", "half litre"));
    store.add(ActiveFilter::checkbox(Category::Availability, "true", "In stock"));
    store.add(ActiveFilter::checkbox(Category::Package, "can", "can"));

    assert_eq!(store.total_active_count(), 3);
    assert_eq!(&decode(&catalog, &encode(store.state())), store.state());
}

#[test]
fn adding_twice_equals_adding_once() {
    let mut once = FilterStore::new(beverages());
    once.add(brand("Fanta"));

    let mut twice = FilterStore::new(beverages());
    twice.add(brand("Fanta"));
    twice.add(brand("Fanta"));

    assert_eq!(once.state(), twice.state());
}

#[test]
fn toggle_is_an_involution() {
    let mut store = FilterStore::new(beverages());
    store.add(brand("Olipop"));
    store.set_sort(SortOption::Newest);
    let before = store.state().clone();

    store.toggle(brand("Red Bull"));
    store.toggle(brand("Red Bull"));
    assert_eq!(store.state(), &before);

    store.toggle(brand("Olipop"));
    store.toggle(brand("Olipop"));
    assert_eq!(store.state(), &before);
}

#[test]
fn radio_group_holds_one_selection() {
    let mut store = FilterStore::new(beverages());
    store.select("package", "package-can");
    store.select("package", "package-keg");

    let selected = store.active_by_category(Category::Package);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, "package-keg");
}

#[test]
fn range_is_clamped_into_declared_bounds() {
    let catalog = Catalog::from_toml_str(
        r#"
        name = "wide"
        [[options]]
        kind = "range"
        category = "price"
        min = 0.0
        max = 100.0
        "#,
    )
    .unwrap();
    let mut store = FilterStore::new(Arc::new(catalog));

    assert!(store.set_range("price-range", -5.0, 1000.0));
    assert_eq!(
        store.state().active_filters["price-range"].value,
        FilterValue::Range { bounds: Bounds::new(0.0, 100.0) }
    );
}

#[test]
fn or_within_category_and_across_categories() {
    let products = vec![
        product("P1", "A", "X", 1.0),
        product("P2", "B", "X", 1.0),
        product("P3", "A", "Y", 1.0),
    ];
    let mut store = FilterStore::new(beverages());
    store.add(brand("A"));
    store.add(brand("B"));
    store.add(ActiveFilter::checkbox(Category::Type, "X", "X"));

    let ids: Vec<String> = apply(&products, store.state()).into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["P1", "P2"]);
}

#[test]
fn featured_does_not_reorder_a_sorted_list() {
    let mut products = vec![
        product("1", "A", "X", 4.0),
        product("2", "A", "X", 1.0),
        product("3", "A", "X", 4.0),
        product("4", "A", "X", 2.0),
    ];
    sort_products(&mut products, SortOption::PriceLow);
    let sorted: Vec<String> = products.iter().map(|p| p.id.clone()).collect();

    let store = FilterStore::new(beverages());
    let featured: Vec<String> = evaluate(&products, store.state())
        .products
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(featured, sorted);
    assert_eq!(sorted, vec!["2", "4", "1", "3"]);
}

#[test]
fn single_brand_end_to_end() {
    let catalog = beverages();
    let mut store = FilterStore::new(Arc::clone(&catalog));
    store.add(brand("Cola"));

    let query = encode(store.state());
    assert_eq!(query.as_str(), "brand=Cola");
    assert!(!query.as_str().contains("sort"));

    let decoded = decode(&catalog, &query);
    let filters: Vec<&ActiveFilter> = decoded.filters().collect();
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].category, Category::Brand);
    assert_eq!(filters[0].value.text(), Some("Cola"));
    assert_eq!(decoded.total_active_count(), 1);
}

#[test]
fn clear_all_resets_filters_and_sort() {
    let mut store = FilterStore::new(beverages());
    store.set_sort(SortOption::Newest);
    store.add(brand("Cola"));
    store.add(brand("Fanta"));

    store.clear_all();
    assert!(store.state().active_filters.is_empty());
    assert_eq!(store.state().sort, SortOption::Featured);
}

#[test]
fn hostile_query_degrades_to_defaults() {
    let catalog = beverages();
    let state = decode(
        &catalog,
        &"sort=%00&price=50-0&instock=yes&brand&type=%E2%9C%93&utm_campaign=x".into(),
    );
    let price = &state.active_filters["price-range"];
    assert_eq!(price.value, FilterValue::Range { bounds: Bounds::new(0.0, 0.0) });
    assert_eq!(state.sort, SortOption::Featured);
    assert!(!state.is_active("availability-instock"));
    assert_eq!(state.active_filters.len(), 1);
}

#[test]
fn newest_handles_products_with_and_without_listing_dates() {
    let mut products: Vec<Product> = (0..2000)
        .map(|n| {
            let mut p = product(&n.to_string(), "A", "X", 1.0);
            p.created_at = (n % 3 != 0).then_some(1_700_000_000 - (n * 7919 % 1000));
            p
        })
        .collect();

    sort_products(&mut products, SortOption::Newest);

    let unlisted_from = products
        .iter()
        .position(|p| p.created_at.is_none())
        .unwrap();
    assert!(products[unlisted_from..].iter().all(|p| p.created_at.is_none()));
    assert!(products[..unlisted_from]
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));
    let unlisted_ids: Vec<u64> = products[unlisted_from..]
        .iter()
        .map(|p| p.id.parse().unwrap())
        .collect();
    assert!(unlisted_ids.windows(2).all(|w| w[0] > w[1]));

    let mut small = vec![
        product("3", "A", "X", 1.0),
        product("1", "A", "X", 1.0),
        product("2", "A", "X", 1.0),
    ];
    small[0].created_at = Some(100);
    small[1].created_at = Some(200);
    sort_products(&mut small, SortOption::Newest);
    let ids: Vec<&str> = small.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "2"]);
}
