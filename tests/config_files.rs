//! Configuration, catalog and product files loaded from disk.

use std::fs;
use storefront_filters::domain::Category;
use storefront_filters::query::QueryString;
use storefront_filters::storage::{JsonProductFile, ProductSource};
use storefront_filters::{handle_event, initialize, Config, Event, StorefrontError};
use tempfile::TempDir;

const SHOP_CATALOG: &str = r#"
name = "corner-shop"
currency_symbol = "$"

[[options]]
kind = "checkbox"
category = "brand"
value = "Jarritos"

[[options]]
kind = "radio"
category = "package"
value = "Glass"
label = "Glass bottle"

[[options]]
kind = "range"
category = "price"
min = 0.0
max = 10.0

[[options]]
kind = "toggle"
toggle = "instock"
"#;

const PRODUCTS: &str = r#"{
  "products": [
    {"id": "1", "name": "Jarritos Mandarin", "price": 2.5, "type": "Soda", "size": "0.37L", "brand": "Jarritos", "package": "Glass", "inStock": true, "createdAt": 1717200000},
    {"id": "2", "name": "Jarritos Lime", "price": 2.5, "type": "Soda", "size": "0.37L", "brand": "Jarritos", "package": "Glass", "inStock": false, "createdAt": 1719800000},
    {"id": "3", "name": "Topo Chico", "price": 3.0, "type": "Water", "size": "0.35L", "brand": "Topo Chico", "package": "Glass", "inStock": true}
  ]
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn config_file_selects_custom_catalog() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write(&dir, "shop.toml", SHOP_CATALOG);
    let config_path = write(
        &dir,
        "storefront.toml",
        &format!("catalog_file = {:?}\nrange_debounce_ms = 0\n", catalog_path.display().to_string()),
    );

    let config = Config::from_file(&config_path).unwrap();
    assert_eq!(config.range_debounce_ms, 0);

    let catalog = config.load_catalog();
    assert_eq!(catalog.name(), "corner-shop");
    assert_eq!(catalog.currency_symbol(), "$");
    assert_eq!(catalog.options_for(Category::Brand).len(), 1);
}

#[test]
fn config_file_with_unknown_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "storefront.toml", "range_debounce = 150\n");
    assert!(matches!(Config::from_file(&path), Err(StorefrontError::Config(_))));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = Config::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(StorefrontError::Io(_))));
}

#[test]
fn cold_load_from_files_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        catalog_file: Some(write(&dir, "shop.toml", SHOP_CATALOG)),
        range_debounce_ms: 0,
        ..Default::default()
    };
    let products = JsonProductFile::new(write(&dir, "products.json", PRODUCTS))
        .load_products()
        .unwrap();

    let mut state = initialize(&config, &QueryString::new("?brand=Jarritos&sort=newest"));
    let (render, actions) = handle_event(&mut state, &Event::ProductsLoaded(products));
    assert!(render);
    assert!(actions.is_empty());

    let ids: Vec<&str> = state.evaluation.products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);

    let panel = state.compute_viewmodel();
    assert_eq!(panel.result_summary, "2 products found");
    assert_eq!(panel.total_active, 1);
    assert_eq!(panel.share_query, "?brand=Jarritos&sort=newest");
}

#[test]
fn cold_load_with_range_uses_catalog_currency() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        catalog_file: Some(write(&dir, "shop.toml", SHOP_CATALOG)),
        ..Default::default()
    };

    let state = initialize(&config, &QueryString::new("price=1-10&instock=true"));
    let panel = state.compute_viewmodel();

    assert_eq!(panel.total_active, 2);
    let tags: Vec<&str> = panel.tags.iter().map(|t| t.text.as_str()).collect();
    assert!(tags.contains(&"Price: $1 - $10+"), "tags: {tags:?}");
}
