//! Filter option catalog.
//!
//! The catalog is the static enumeration of categories and their selectable
//! options. It is consumed by the presentation layer (to render sections) and
//! by the URL codec (to restore labels, kinds and range bounds).
//!
//! Catalogs are written in TOML, either built in or loaded from a file:
//!
//! ```toml
//! name = "my-shop"
//! currency_symbol = "€"
//!
//! [[options]]
//! kind = "checkbox"
//! category = "brand"
//! value = "Olipop"
//!
//! [[options]]
//! kind = "radio"
//! category = "package"
//! value = "Can"
//!
//! [[options]]
//! kind = "range"
//! category = "price"
//! label = "Price"
//! min = 0.0
//! max = 50.0
//!
//! [[options]]
//! kind = "toggle"
//! toggle = "instock"
//! ```
//!
//! Option ids are never written in the file; they are derived with
//! [`option_id`](crate::domain::option_id).

use crate::domain::error::{Result, StorefrontError};
use crate::domain::{
    ActiveFilter, AvailabilityToggle, Bounds, Category, FilterOption, FilterValue, Kind, Product,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Name of the built-in catalog.
pub const DEFAULT_CATALOG: &str = "beverages";

/// One `[[options]]` entry of a catalog file.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum OptionSpec {
    Checkbox {
        category: Category,
        value: String,
        #[serde(default)]
        label: Option<String>,
    },
    Radio {
        category: Category,
        #[serde(default)]
        group: Option<String>,
        value: String,
        #[serde(default)]
        label: Option<String>,
    },
    Toggle {
        toggle: AvailabilityToggle,
        #[serde(default)]
        label: Option<String>,
    },
    Range {
        category: Category,
        min: f64,
        max: f64,
        #[serde(default)]
        label: Option<String>,
    },
}

impl OptionSpec {
    fn into_option(self) -> FilterOption {
        match self {
            Self::Checkbox { category, value, label } => {
                let label = label.unwrap_or_else(|| value.clone());
                FilterOption::checkbox(category, value, label)
            }
            Self::Radio { category, group, value, label } => {
                let label = label.unwrap_or_else(|| value.clone());
                let group = group.unwrap_or_else(|| category.as_str().to_string());
                FilterOption::radio(category, group, value, label)
            }
            Self::Toggle { toggle, label } => {
                FilterOption::toggle(toggle, label.unwrap_or_else(|| toggle.default_label().to_string()))
            }
            Self::Range { category, min, max, label } => {
                let label = label.unwrap_or_else(|| category.title().to_string());
                FilterOption::range(category, Bounds::new(min, max), label)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    name: String,
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
    #[serde(default)]
    options: Vec<OptionSpec>,
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

/// Static set of filter options, indexed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    name: String,
    currency_symbol: String,
    options: Vec<FilterOption>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from options, validating identity and bounds.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Catalog`] if two options share an id, if a
    /// range option has non-finite or inverted bounds, or if a toggle is
    /// placed outside the availability category.
    pub fn from_options(
        name: impl Into<String>,
        currency_symbol: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(options.len());

        for (position, option) in options.iter().enumerate() {
            if index.insert(option.id.clone(), position).is_some() {
                return Err(StorefrontError::Catalog(format!(
                    "duplicate option id: {}",
                    option.id
                )));
            }

            match &option.value {
                FilterValue::Range { bounds } if !bounds.is_valid() => {
                    return Err(StorefrontError::Catalog(format!(
                        "invalid bounds for {}: [{}, {}]",
                        option.id, bounds.min, bounds.max
                    )));
                }
                FilterValue::Toggle { .. } if option.category != Category::Availability => {
                    return Err(StorefrontError::Catalog(format!(
                        "toggle {} must belong to the availability category",
                        option.id
                    )));
                }
                FilterValue::Checkbox { value } | FilterValue::Radio { value, .. }
                    if crate::domain::filter::normalize_value(value).is_empty() =>
                {
                    return Err(StorefrontError::Catalog(format!(
                        "option value {value:?} in {} has no identity",
                        option.category
                    )));
                }
                _ => {}
            }
        }

        let catalog = Self {
            name: name.into(),
            currency_symbol: currency_symbol.into(),
            options,
            index,
        };

        tracing::debug!(
            catalog = %catalog.name,
            option_count = catalog.options.len(),
            "catalog built"
        );

        Ok(catalog)
    }

    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Catalog`] for invalid TOML or an
    /// inconsistent option set.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| StorefrontError::Catalog(format!("failed to parse catalog TOML: {e}")))?;

        let options = file.options.into_iter().map(OptionSpec::into_option).collect();
        Self::from_options(file.name, file.currency_symbol, options)
    }

    /// Loads a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Io`] if the file cannot be read, or
    /// [`StorefrontError::Catalog`] if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading catalog file");
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads a built-in catalog by name.
    ///
    /// ```
    /// use storefront_filters::Catalog;
    ///
    /// assert!(Catalog::from_name("beverages").is_some());
    /// assert!(Catalog::from_name("hardware").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "beverages" | "default" => include_str!("../../catalogs/beverages.toml"),
            _ => return None,
        };

        Self::from_toml_str(toml_str)
            .map_err(|e| tracing::error!(catalog = name, error = %e, "built-in catalog failed to parse"))
            .ok()
    }

    /// Catalog name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currency symbol used in range display values.
    #[must_use]
    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Every option in catalog order.
    #[must_use]
    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Options of `category` in catalog order.
    #[must_use]
    pub fn options_for(&self, category: Category) -> Vec<&FilterOption> {
        self.options.iter().filter(|o| o.category == category).collect()
    }

    /// Looks an option up by id.
    #[must_use]
    pub fn option(&self, id: &str) -> Option<&FilterOption> {
        self.index.get(id).and_then(|&i| self.options.get(i))
    }

    /// Looks an option up by `(category, value)` through identity derivation.
    #[must_use]
    pub fn find(&self, category: Category, value: &str) -> Option<&FilterOption> {
        self.option(&crate::domain::option_id(category, value))
            .filter(|o| o.category == category)
    }

    /// Widget kind of a category.
    ///
    /// Taken from the category's first option; categories without options
    /// fall back to range for price, toggle for availability and checkbox
    /// otherwise.
    #[must_use]
    pub fn kind_for(&self, category: Category) -> Kind {
        self.options
            .iter()
            .find(|o| o.category == category)
            .map_or(
                match category {
                    Category::Price => Kind::Range,
                    Category::Availability => Kind::Toggle,
                    _ => Kind::Checkbox,
                },
                FilterOption::kind,
            )
    }

    /// Radio group of a category, if its options are radios.
    #[must_use]
    pub fn radio_group_for(&self, category: Category) -> Option<&str> {
        self.options
            .iter()
            .filter(|o| o.category == category)
            .find_map(FilterOption::group)
    }

    /// Range option of a category, if declared.
    #[must_use]
    pub fn range_option(&self, category: Category) -> Option<&FilterOption> {
        self.options
            .iter()
            .find(|o| o.category == category && o.kind() == Kind::Range)
    }

    /// Option for an availability toggle.
    ///
    /// Toggles have fixed identities, so a catalog that does not declare one
    /// still yields an option with the default label.
    #[must_use]
    pub fn toggle_option(&self, toggle: AvailabilityToggle) -> FilterOption {
        let fallback = FilterOption::toggle(toggle, toggle.default_label());
        self.option(&fallback.id).cloned().unwrap_or(fallback)
    }

    /// Catalog label for a raw value, or the raw value itself when unknown.
    ///
    /// ```
    /// use storefront_filters::{Catalog, domain::Category};
    ///
    /// let catalog = Catalog::default();
    /// assert_eq!(catalog.resolve_label(Category::Package, "glass"), "Glass bottle");
    /// assert_eq!(catalog.resolve_label(Category::Brand, "Cola"), "Cola");
    /// ```
    #[must_use]
    pub fn resolve_label(&self, category: Category, value: &str) -> String {
        self.find(category, value)
            .map_or_else(|| value.to_string(), |o| o.label.clone())
    }

    /// Builds the active filter for a raw text value of `category`.
    ///
    /// Known values take the catalog option verbatim. Unknown values are kept
    /// with the raw value as label, shaped after the category's kind.
    #[must_use]
    pub fn text_filter(&self, category: Category, value: &str) -> ActiveFilter {
        if let Some(option) = self.find(category, value) {
            return option.to_active();
        }

        let option = match self.radio_group_for(category) {
            Some(group) => FilterOption::radio(category, group, value, value),
            None if self.kind_for(category) == Kind::Radio => {
                FilterOption::radio(category, category.as_str(), value, value)
            }
            None => FilterOption::checkbox(category, value, value),
        };
        option.to_active()
    }

    /// Options of `category` that occur in `products`.
    ///
    /// Text categories such as brand are narrowed to values present in the
    /// current product set; other categories are returned unchanged.
    #[must_use]
    pub fn options_present_in(&self, category: Category, products: &[Product]) -> Vec<&FilterOption> {
        self.options_for(category)
            .into_iter()
            .filter(|option| {
                option.value.text().map_or(true, |value| {
                    products.iter().any(|p| p.matches_text(category, value))
                })
            })
            .collect()
    }

    /// Formats a selected interval for display, e.g. `€10 - €50+`.
    ///
    /// The `+` marks an upper end resting on the declared maximum.
    #[must_use]
    pub fn format_range(&self, selected: Bounds, declared: Bounds) -> String {
        let plus = if selected.max >= declared.max { "+" } else { "" };
        format!(
            "{sym}{min} - {sym}{max}{plus}",
            sym = self.currency_symbol,
            min = format_amount(selected.min),
            max = format_amount(selected.max),
        )
    }
}

impl Default for Catalog {
    /// Returns the built-in beverage catalog.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog fails to parse (should never occur).
    fn default() -> Self {
        Self::from_name(DEFAULT_CATALOG).expect("Built-in beverages catalog should always parse")
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}
