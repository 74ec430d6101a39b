//! URL query string representation of the filter state.
//!
//! The query string is the serialized, shareable form of a
//! [`FilterState`](crate::domain::FilterState). It is a projection of the
//! store, never an independent source of truth, except on cold load and on
//! back/forward navigation, when it is decoded back into the store.
//!
//! # Keys
//!
//! | key          | meaning                                   |
//! |--------------|-------------------------------------------|
//! | `type`       | beverage type, repeatable                 |
//! | `package`    | packaging, repeatable                     |
//! | `size`       | container size, repeatable                |
//! | `brand`      | brand, repeatable                         |
//! | `price`      | price range as `<min>-<max>`              |
//! | `instock`    | `true` when the in-stock toggle is on     |
//! | `returnable` | `true` when the returnable toggle is on   |
//! | `sort`       | `price-low`, `price-high` or `newest`     |
//! | `q`          | search text                               |
//!
//! Any other key is ignored.
//!
//! # Example
//!
//! ```rust
//! use storefront_filters::query::{decode, encode, QueryString};
//! use storefront_filters::Catalog;
//!
//! let catalog = Catalog::default();
//! let state = decode(&catalog, &QueryString::new("?brand=Olipop&sort=newest"));
//! assert_eq!(encode(&state).as_str(), "brand=Olipop&sort=newest");
//! ```

pub mod codec;

pub use codec::{decode, encode};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use url::form_urlencoded;

/// A form-urlencoded query string without the leading `?`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryString(String);

impl QueryString {
    /// Wraps a raw query, dropping a leading `?` if present.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.strip_prefix('?') {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(raw),
        }
    }

    /// Query text without the leading `?`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the query has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Suffix to append to a path: `?…`, or nothing for an empty query.
    #[must_use]
    pub fn to_url_suffix(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!("?{}", self.0)
        }
    }

    /// Decoded `(key, value)` pairs in query order.
    pub fn pairs(&self) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
        form_urlencoded::parse(self.0.as_bytes())
    }

    /// Returns true when both queries carry the same parameters, regardless
    /// of order or percent-encoding style.
    #[must_use]
    pub fn same_params(&self, other: &Self) -> bool {
        let sorted = |q: &Self| {
            let mut pairs: Vec<(String, String)> = q
                .pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            pairs.sort();
            pairs
        };
        self == other || sorted(self) == sorted(other)
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryString {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for QueryString {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
