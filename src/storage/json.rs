//! JSON file product source.
//!
//! Two layouts are accepted: a bare array of products, or an object with a
//! `products` array (the shape most storefront APIs return).
//!
//! ```json
//! {
//!   "products": [
//!     {
//!       "id": "1",
//!       "name": "Olipop Vintage Cola",
//!       "price": 2.49,
//!       "type": "Soda",
//!       "size": "0.33L",
//!       "brand": "Olipop",
//!       "package": "Can",
//!       "inStock": true,
//!       "returnable": false,
//!       "createdAt": 1717200000
//!     }
//!   ]
//! }
//! ```

use crate::domain::error::{Result, StorefrontError};
use crate::domain::Product;
use crate::storage::ProductSource;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductFile {
    List(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl ProductFile {
    fn into_products(self) -> Vec<Product> {
        match self {
            Self::List(products) | Self::Wrapped { products } => products,
        }
    }
}

/// Products read from a JSON file on each load.
#[derive(Debug, Clone)]
pub struct JsonProductFile {
    file_path: PathBuf,
}

impl JsonProductFile {
    /// Creates a source for `file_path`; nothing is read until
    /// [`load_products`](ProductSource::load_products).
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Path the products are read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Parses products from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Products`] if the text is not one of the
    /// accepted layouts, or if two products share an id.
    pub fn parse(json: &str) -> Result<Vec<Product>> {
        let products = serde_json::from_str::<ProductFile>(json)
            .map_err(|e| StorefrontError::Products(format!("failed to parse JSON: {e}")))?
            .into_products();

        let mut seen = HashSet::with_capacity(products.len());
        if let Some(duplicate) = products.iter().find(|p| !seen.insert(p.id.as_str())) {
            return Err(StorefrontError::Products(format!(
                "duplicate product id: {}",
                duplicate.id
            )));
        }

        Ok(products)
    }
}

impl ProductSource for JsonProductFile {
    fn load_products(&self) -> Result<Vec<Product>> {
        let _span = tracing::debug_span!("json_load_products", path = ?self.file_path).entered();

        let contents = std::fs::read_to_string(&self.file_path)?;
        let products = Self::parse(&contents)?;

        tracing::debug!(count = products.len(), "products loaded");
        Ok(products)
    }
}
