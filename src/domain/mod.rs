//! Domain layer: filter vocabulary, products and errors.
//!
//! These types are shared by the catalog, the URL codec, the state store and
//! the evaluator. They carry no behavior that depends on a catalog instance or
//! on the URL representation.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`filter`]: Categories, filter values, options, active filters and state
//! - [`product`]: Product records read by the evaluator
//!
//! # Examples
//!
//! ```
//! use storefront_filters::domain::{option_id, Category};
//!
//! assert_eq!(option_id(Category::Brand, "Olipop"), "brand-olipop");
//! ```

pub mod error;
pub mod filter;
pub mod product;

pub use error::{Result, StorefrontError};
pub use filter::{
    option_id, ActiveFilter, AvailabilityToggle, Bounds, Category, FilterOption, FilterState,
    FilterValue, Kind, SortOption,
};
pub use product::Product;
