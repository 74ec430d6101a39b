//! Product data provider.
//!
//! The filter panel never fetches products itself; a [`ProductSource`]
//! supplies the list and the host forwards it as
//! [`Event::ProductsLoaded`](crate::app::Event::ProductsLoaded).
//!
//! # Modules
//!
//! - `json`: products read from a JSON file

pub mod json;

pub use json::JsonProductFile;

use crate::domain::error::Result;
use crate::domain::Product;

/// Supplies the product list to filter.
pub trait ProductSource {
    /// Loads every product in featured order.
    ///
    /// # Errors
    ///
    /// Returns an error if the products cannot be read or parsed.
    fn load_products(&self) -> Result<Vec<Product>>;
}

impl ProductSource for Vec<Product> {
    fn load_products(&self) -> Result<Vec<Product>> {
        Ok(self.clone())
    }
}
