//! Storefront Filters: filter and sort state management for a beverage shop.
//!
//! The crate owns the state behind a storefront's product filter panel:
//! - A catalog of filter options (brand, type, package, size, price,
//!   availability) loaded from TOML
//! - A store holding the active filters, sort order and search text
//! - A deterministic URL codec so every state is shareable and bookmarkable
//! - Loop-free synchronization between the store and the browser URL
//! - A pure evaluator producing the filtered, sorted product list
#![allow(clippy::multiple_crate_versions)]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (browser shim, CLI in main.rs)                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Event            ▲ Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling          - URL sync state machine │
//! │  - Filter store            - Range write debounce   │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Query (query/)│   │ Eval (eval/)  │   │ Storage       │
//! │ - encode      │   │ - OR / AND    │   │ (storage/)    │
//! │ - decode      │   │ - fuzzy search│   │ - JSON files  │
//! │               │   │ - stable sort │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Catalog (catalog/) & Domain (domain/)              │
//! │  - Option identity        - Product model           │
//! │  - Labels, kinds, bounds  - Error types             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Store, event handler, URL sync and view model computation
//! - [`catalog`]: Filter option catalog
//! - [`domain`]: Filter vocabulary, products and errors
//! - [`eval`]: Product filtering and sorting
//! - [`query`]: URL query string codec
//! - [`storage`]: Product data sources
//! - [`ui`]: View model types
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! ```toml
//! # storefront.toml
//! catalog = "beverages"            # built-in catalog name
//! catalog_file = "shop.toml"       # or a custom catalog, takes precedence
//! range_debounce_ms = 150          # quiet period before a slider writes the URL
//! trace_level = "storefront_filters=debug"
//! trace_dir = "/var/log/storefront"
//! ```
//!
//! # Example
//!
//! ```rust
//! use storefront_filters::{handle_event, initialize, Action, Config, Event};
//! use storefront_filters::domain::SortOption;
//! use storefront_filters::query::QueryString;
//!
//! let config = Config { range_debounce_ms: 0, ..Default::default() };
//! let mut state = initialize(&config, &QueryString::new("?brand=Olipop"));
//!
//! let (render, actions) = handle_event(&mut state, &Event::SetSort(SortOption::Newest));
//! assert!(render);
//! assert_eq!(
//!     actions,
//!     vec![Action::ReplaceUrl(QueryString::new("brand=Olipop&sort=newest"))]
//! );
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod eval;
pub mod observability;
pub mod query;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use catalog::Catalog;
pub use domain::{Result, StorefrontError};

use query::QueryString;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default quiet period before a range change is written to the URL.
pub const DEFAULT_RANGE_DEBOUNCE_MS: u64 = 150;

/// Runtime configuration.
///
/// Read from a TOML file with [`Config::from_file`] or from a flat string map
/// (environment, query of an embedding page) with [`Config::from_map`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Built-in catalog name. Ignored if `catalog_file` is set.
    pub catalog: Option<String>,

    /// Path to a custom TOML catalog.
    pub catalog_file: Option<PathBuf>,

    /// Milliseconds of slider inactivity before the URL is written; `0`
    /// writes on every movement. Default: `150`
    pub range_debounce_ms: u64,

    /// `EnvFilter` directive for exported spans. Default: `"info"`
    pub trace_level: Option<String>,

    /// Directory for the trace file. Default: the platform data directory.
    pub trace_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            catalog_file: None,
            range_debounce_ms: DEFAULT_RANGE_DEBOUNCE_MS,
            trace_level: None,
            trace_dir: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map.
    ///
    /// Unknown keys are ignored and unparsable numbers fall back to their
    /// defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use storefront_filters::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("catalog".to_string(), "beverages".to_string());
    /// map.insert("range_debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.catalog.as_deref(), Some("beverages"));
    /// assert_eq!(config.range_debounce_ms, 150);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let range_debounce_ms = map
            .get("range_debounce_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RANGE_DEBOUNCE_MS);

        Self {
            catalog: non_empty("catalog"),
            catalog_file: non_empty("catalog_file").map(PathBuf::from),
            range_debounce_ms,
            trace_level: non_empty("trace_level"),
            trace_dir: non_empty("trace_dir").map(PathBuf::from),
        }
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] for invalid TOML, unknown keys or
    /// mistyped values.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| StorefrontError::Config(format!("failed to parse config TOML: {e}")))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Io`] if the file cannot be read, or
    /// [`StorefrontError::Config`] if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading config file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Range write debounce as a duration.
    #[must_use]
    pub const fn range_debounce(&self) -> Duration {
        Duration::from_millis(self.range_debounce_ms)
    }

    /// Directory the trace file is written to.
    ///
    /// Falls back to `$XDG_DATA_HOME/storefront-filters`, then
    /// `~/.local/share/storefront-filters`, then the system temp directory.
    #[must_use]
    pub fn trace_dir(&self) -> PathBuf {
        if let Some(dir) = &self.trace_dir {
            return dir.clone();
        }
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
            .unwrap_or_else(std::env::temp_dir)
            .join("storefront-filters")
    }

    /// Resolves the catalog: `catalog_file`, then `catalog`, then the
    /// built-in default. Load failures fall through to the next source.
    #[must_use]
    pub fn load_catalog(&self) -> Catalog {
        if let Some(file) = &self.catalog_file {
            match Catalog::from_file(file) {
                Ok(catalog) => return catalog,
                Err(e) => {
                    tracing::debug!(catalog_file = ?file, error = %e, "failed to load catalog from file, using default");
                }
            }
        }

        self.catalog.as_ref().map_or_else(Catalog::default, |name| {
            Catalog::from_name(name).unwrap_or_else(|| {
                tracing::debug!(catalog = %name, "unknown catalog, using default");
                Catalog::default()
            })
        })
    }
}

/// Creates an [`AppState`] for a page loaded with `initial_url`.
///
/// The catalog is resolved through [`Config::load_catalog`]. The product list
/// starts empty; deliver products with
/// [`Event::ProductsLoaded`](app::Event::ProductsLoaded).
#[must_use]
pub fn initialize(config: &Config, initial_url: &QueryString) -> AppState {
    tracing::debug!(
        catalog = ?config.catalog,
        catalog_file = ?config.catalog_file,
        range_debounce_ms = config.range_debounce_ms,
        "initializing storefront filters"
    );

    AppState::from_url(
        config.load_catalog(),
        Vec::new(),
        config.range_debounce(),
        initial_url,
    )
}
