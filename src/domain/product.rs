//! Product records as supplied by the product data provider.
//!
//! The evaluator only reads these fields and never mutates them.

use super::filter::{normalize_value, AvailabilityToggle, Category};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A product listed in the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Record identifier. Numeric ids are assumed to grow with creation order.
    pub id: String,
    /// Display name, also the target of the search box.
    pub name: String,
    /// Unit price in the catalog currency.
    pub price: f64,
    /// Beverage type (`type` in JSON).
    #[serde(rename = "type")]
    pub product_type: String,
    /// Container size, e.g. `0.33L`.
    pub size: String,
    /// Brand name as shown in the brand filter.
    pub brand: String,
    /// Packaging, if the provider reports it.
    #[serde(default)]
    pub package: Option<String>,
    /// Available for immediate delivery.
    pub in_stock: bool,
    /// Sold in deposit packaging.
    #[serde(default)]
    pub returnable: bool,
    /// Unix timestamp of when the product was listed, if known.
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Product {
    /// Text field backing a text category, if any.
    #[must_use]
    pub fn text_field(&self, category: Category) -> Option<&str> {
        match category {
            Category::Brand => Some(&self.brand),
            Category::Type => Some(&self.product_type),
            Category::Package => self.package.as_deref(),
            Category::Size => Some(&self.size),
            Category::Price | Category::Availability => None,
        }
    }

    /// Numeric field backing a range category, if any.
    #[must_use]
    pub const fn numeric_field(&self, category: Category) -> Option<f64> {
        match category {
            Category::Price => Some(self.price),
            _ => None,
        }
    }

    /// Returns true when the text field for `category` matches `value`
    /// under option identity normalization.
    #[must_use]
    pub fn matches_text(&self, category: Category, value: &str) -> bool {
        self.text_field(category)
            .is_some_and(|field| normalize_value(field) == normalize_value(value))
    }

    /// Boolean predicate behind an availability toggle.
    #[must_use]
    pub const fn satisfies(&self, toggle: AvailabilityToggle) -> bool {
        match toggle {
            AvailabilityToggle::InStock => self.in_stock,
            AvailabilityToggle::Returnable => self.returnable,
        }
    }

    /// Orders two products by recency, oldest first.
    ///
    /// Listed products rank by timestamp and always after products with no
    /// timestamp. Ties fall back to the id: numeric ids by value and after
    /// non-numeric ones, then lexically.
    #[must_use]
    pub fn cmp_recency(&self, other: &Self) -> Ordering {
        self.recency_key().cmp(&other.recency_key())
    }

    fn recency_key(&self) -> (Option<i64>, Option<u64>, &str) {
        (self.created_at, self.id.parse().ok(), &self.id)
    }
}
