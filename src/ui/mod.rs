//! Presentation adapters.
//!
//! The crate does not render anything itself. This module defines the view
//! model a front end binds to:
//!
//! ```text
//! AppState → compute_viewmodel → FilterPanelViewModel → front end
//! ```
//!
//! # Example
//!
//! ```rust
//! use storefront_filters::app::{handle_event, AppState, Event};
//! use storefront_filters::Catalog;
//! use std::time::Duration;
//!
//! let mut state = AppState::new(Catalog::default(), Vec::new(), Duration::ZERO);
//! handle_event(&mut state, &Event::SetSearch(Some("tonic".into())));
//!
//! let panel = state.compute_viewmodel();
//! assert_eq!(panel.total_active, 1);
//! assert_eq!(panel.tags[0].text, "\"tonic\"");
//! ```

pub mod viewmodel;

pub use viewmodel::{
    FilterPanelViewModel, OptionView, RangeView, SectionView, SortOptionView, TagView,
};
