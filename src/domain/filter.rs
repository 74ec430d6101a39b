//! Filter vocabulary shared by the catalog, codec, store and evaluator.
//!
//! A [`FilterOption`] is a catalog entry; an [`ActiveFilter`] is an option the
//! shopper currently has selected. Both carry a [`FilterValue`], a sum type
//! with one case per selection [`Kind`], so code that switches on the kind is
//! checked for exhaustiveness by the compiler.
//!
//! Option identity is derived, never assigned: [`option_id`] maps a
//! `(category, value)` pair to the same string every time, which is what lets
//! a decoded URL reproduce the filters it was encoded from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Grouping axis for filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Producer brand (`brand=` in the URL).
    Brand,
    /// Beverage type such as soda or juice (`type=`).
    Type,
    /// Packaging such as can or bottle (`package=`).
    Package,
    /// Container size (`size=`).
    Size,
    /// Price range (`price=<min>-<max>`).
    Price,
    /// Availability toggles (`instock=true`, `returnable=true`).
    Availability,
}

impl Category {
    /// Every category in panel display order.
    pub const ALL: [Self; 6] = [
        Self::Brand,
        Self::Type,
        Self::Package,
        Self::Size,
        Self::Price,
        Self::Availability,
    ];

    /// Lowercase name, also used as the URL key and the option id prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Type => "type",
            Self::Package => "package",
            Self::Size => "size",
            Self::Price => "price",
            Self::Availability => "availability",
        }
    }

    /// Human-readable section title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Type => "Type",
            Self::Package => "Package",
            Self::Size => "Size",
            Self::Price => "Price",
            Self::Availability => "Availability",
        }
    }

    /// Parses a lowercase category name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection cardinality and value shape of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Any number of options may be selected.
    Checkbox,
    /// At most one option per group.
    Radio,
    /// Boolean on/off switch.
    Toggle,
    /// Numeric `[min, max]` interval.
    Range,
}

impl Kind {
    /// Lowercase name as written in catalog files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Toggle => "toggle",
            Self::Range => "range",
        }
    }
}

/// Availability switches, each with a dedicated boolean URL key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AvailabilityToggle {
    /// Only products currently in stock.
    #[serde(rename = "instock")]
    InStock,
    /// Only products in returnable (deposit) packaging.
    #[serde(rename = "returnable")]
    Returnable,
}

impl AvailabilityToggle {
    /// Both toggles in URL key order.
    pub const ALL: [Self; 2] = [Self::InStock, Self::Returnable];

    /// URL key, e.g. `instock`.
    #[must_use]
    pub const fn query_key(self) -> &'static str {
        match self {
            Self::InStock => "instock",
            Self::Returnable => "returnable",
        }
    }

    /// Label used when a catalog does not provide one.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::Returnable => "Returnable",
        }
    }

    /// Parses a URL key.
    #[must_use]
    pub fn from_query_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.query_key() == key)
    }
}

/// Inclusive numeric interval used by range filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl Bounds {
    /// Creates a new interval without validation.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true when `value` lies within the interval, bounds included.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns true when both bounds are finite and `min <= max`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Clamps this interval into `outer`.
    ///
    /// Each end is clamped into `outer`; a NaN end snaps to the matching
    /// outer bound. The lower end is then clamped to be no greater than the
    /// upper end, so the result is never inverted.
    ///
    /// ```
    /// use storefront_filters::domain::Bounds;
    ///
    /// let clamped = Bounds::new(-5.0, 1000.0).clamp_within(Bounds::new(0.0, 100.0));
    /// assert_eq!(clamped, Bounds::new(0.0, 100.0));
    /// ```
    #[must_use]
    pub fn clamp_within(self, outer: Self) -> Self {
        let clamp = |v: f64, fallback: f64| {
            if v.is_nan() {
                fallback
            } else {
                v.max(outer.min).min(outer.max)
            }
        };
        let max = clamp(self.max, outer.max);
        let min = clamp(self.min, outer.min).min(max);
        Self { min, max }
    }
}

/// The value an option represents, one case per [`Kind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterValue {
    /// Multi-select text value.
    Checkbox {
        /// Domain value, e.g. `"Olipop"`.
        value: String,
    },
    /// Single-select text value within a group.
    Radio {
        /// Exclusivity group; defaults to the category name.
        group: String,
        /// Domain value.
        value: String,
    },
    /// Availability switch.
    Toggle {
        /// Which switch.
        toggle: AvailabilityToggle,
    },
    /// Numeric interval.
    Range {
        /// For catalog options the declared bounds, for active filters the
        /// selected interval.
        bounds: Bounds,
    },
}

impl FilterValue {
    /// Selection kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Checkbox { .. } => Kind::Checkbox,
            Self::Radio { .. } => Kind::Radio,
            Self::Toggle { .. } => Kind::Toggle,
            Self::Range { .. } => Kind::Range,
        }
    }

    /// Text value for checkbox and radio values.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Checkbox { value } | Self::Radio { value, .. } => Some(value),
            Self::Toggle { .. } | Self::Range { .. } => None,
        }
    }

    /// The string identity is derived from.
    ///
    /// Text values use themselves, toggles their URL key and ranges the
    /// fixed word `range` (one range option per category).
    #[must_use]
    pub fn identity(&self) -> &str {
        match self {
            Self::Checkbox { value } | Self::Radio { value, .. } => value,
            Self::Toggle { toggle } => toggle.query_key(),
            Self::Range { .. } => "range",
        }
    }
}

/// Lowercases `value` and collapses every run of non-alphanumeric characters
/// into a single `-`, trimming dashes at both ends.
#[must_use]
pub fn normalize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Derives the stable option identity for a `(category, value)` pair.
///
/// ```
/// use storefront_filters::domain::{option_id, Category};
///
/// assert_eq!(option_id(Category::Brand, "Coca-Cola"), "brand-coca-cola");
/// assert_eq!(option_id(Category::Size, "0.33 L"), "size-0-33-l");
/// assert_eq!(option_id(Category::Brand, "COCA cola"), option_id(Category::Brand, "coca-cola"));
/// ```
#[must_use]
pub fn option_id(category: Category, value: &str) -> String {
    format!("{}-{}", category.as_str(), normalize_value(value))
}

/// A selectable value within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Stable identity, unique within the catalog.
    pub id: String,
    /// Display text.
    pub label: String,
    /// Owning category.
    pub category: Category,
    /// Domain value and kind.
    pub value: FilterValue,
}

impl FilterOption {
    /// Creates an option, deriving its id from `category` and `value`.
    #[must_use]
    pub fn new(category: Category, label: impl Into<String>, value: FilterValue) -> Self {
        Self {
            id: option_id(category, value.identity()),
            label: label.into(),
            category,
            value,
        }
    }

    /// Creates a checkbox option.
    #[must_use]
    pub fn checkbox(category: Category, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(category, label, FilterValue::Checkbox { value: value.into() })
    }

    /// Creates a radio option in `group`.
    #[must_use]
    pub fn radio(
        category: Category,
        group: impl Into<String>,
        value: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(
            category,
            label,
            FilterValue::Radio {
                group: group.into(),
                value: value.into(),
            },
        )
    }

    /// Creates an availability toggle option.
    #[must_use]
    pub fn toggle(toggle: AvailabilityToggle, label: impl Into<String>) -> Self {
        Self::new(Category::Availability, label, FilterValue::Toggle { toggle })
    }

    /// Creates a range option with declared bounds.
    #[must_use]
    pub fn range(category: Category, bounds: Bounds, label: impl Into<String>) -> Self {
        Self::new(category, label, FilterValue::Range { bounds })
    }

    /// Selection kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Radio group, if this is a radio option.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        match &self.value {
            FilterValue::Radio { group, .. } => Some(group),
            _ => None,
        }
    }

    /// Declared bounds, if this is a range option.
    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        match self.value {
            FilterValue::Range { bounds } => Some(bounds),
            _ => None,
        }
    }

    /// Snapshot of this option as a selected filter.
    #[must_use]
    pub fn to_active(&self) -> ActiveFilter {
        ActiveFilter {
            id: self.id.clone(),
            label: self.label.clone(),
            category: self.category,
            value: self.value.clone(),
            display_value: None,
        }
    }
}

/// An option the shopper currently has selected.
///
/// Carries a denormalized copy of the option so tags can be rendered without
/// a catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFilter {
    /// Identity of the selected option.
    pub id: String,
    /// Display text.
    pub label: String,
    /// Owning category.
    pub category: Category,
    /// Selected value.
    pub value: FilterValue,
    /// Pre-formatted value for display, used by range filters (`"€10 - €50+"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl ActiveFilter {
    /// Creates a checkbox filter for a raw `(category, value)` pair.
    #[must_use]
    pub fn checkbox(category: Category, value: impl Into<String>, label: impl Into<String>) -> Self {
        FilterOption::checkbox(category, value, label).to_active()
    }

    /// Selection kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Radio group, if this is a radio filter.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        match &self.value {
            FilterValue::Radio { group, .. } => Some(group),
            _ => None,
        }
    }

    /// Text for a tag: the display value when present, else the label.
    #[must_use]
    pub fn tag_text(&self) -> &str {
        self.display_value.as_deref().unwrap_or(&self.label)
    }
}

/// Product ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order, unmodified.
    #[default]
    Featured,
    /// Ascending by price.
    PriceLow,
    /// Descending by price.
    PriceHigh,
    /// Most recently added first.
    Newest,
}

impl SortOption {
    /// Every sort option in display order.
    pub const ALL: [Self; 4] = [Self::Featured, Self::PriceLow, Self::PriceHigh, Self::Newest];

    /// URL value, e.g. `price-low`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
        }
    }

    /// Display text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Newest => "Newest",
        }
    }

    /// Parses a URL value; unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate filter state: active filters, sort order and search text.
///
/// Filters are keyed by id, which gives set semantics and makes equality
/// independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected filters keyed by option id.
    pub active_filters: BTreeMap<String, ActiveFilter>,
    /// Active sort order.
    pub sort: SortOption,
    /// Search text owned by the search box; `None` when blank.
    pub search_query: Option<String>,
}

impl FilterState {
    /// Returns true when nothing deviates from the defaults.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.active_filters.is_empty()
            && self.sort == SortOption::Featured
            && self.search_query.is_none()
    }

    /// Iterates over active filters in id order.
    pub fn filters(&self) -> impl Iterator<Item = &ActiveFilter> {
        self.active_filters.values()
    }

    /// Returns true when a filter with `id` is active.
    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.active_filters.contains_key(id)
    }

    /// Active filters belonging to `category`.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&ActiveFilter> {
        self.filters().filter(|f| f.category == category).collect()
    }

    /// Active filter count plus one for a present search query.
    #[must_use]
    pub fn total_active_count(&self) -> usize {
        self.active_filters.len() + usize::from(self.search_query.is_some())
    }

    /// Trims a search query, mapping blank input to `None`.
    #[must_use]
    pub fn normalize_search(query: Option<&str>) -> Option<String> {
        query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(String::from)
    }
}
