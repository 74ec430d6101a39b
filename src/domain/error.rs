//! Error types for the storefront filter crate.
//!
//! The filter core (catalog lookups, URL codec, store mutations, evaluator)
//! never fails: malformed input is absorbed with a sane default. Errors only
//! originate at the edges, when catalogs, configuration or product data are
//! loaded from disk.

use thiserror::Error;

/// The main error type for storefront filter operations.
///
/// # Examples
///
/// ```
/// use storefront_filters::StorefrontError;
///
/// fn load_catalog() -> Result<(), StorefrontError> {
///     Err(StorefrontError::Catalog("duplicate option id: brand-cola".to_string()))
/// }
///
/// assert!(load_catalog().is_err());
/// ```
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catalog definition could not be parsed or is inconsistent.
    ///
    /// Raised for invalid TOML, duplicate option ids and inverted range bounds.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Product data could not be decoded.
    #[error("Product data error: {0}")]
    Products(String),
}

/// A specialized `Result` type for storefront filter operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;
