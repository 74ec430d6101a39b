//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point through which the host drives
//! the filter panel. It mutates [`AppState`], recomputes the product
//! evaluation when the filter state changed, and returns the side effects the
//! host must perform.
//!
//! # Event Types
//!
//! - **Gestures**: `Add`, `Remove`, `Toggle`, `Select`, `SetRange`,
//!   `SetToggle`, `ClearCategory`, `ClearAll`, `SetSort`, `SetSearch`
//! - **Environment**: `UrlChanged` (navigation or the echo of our own write),
//!   `Tick` (debounce timer), `ProductsLoaded`
//!
//! # URL writes
//!
//! Every effective gesture produces at most one [`Action::ReplaceUrl`].
//! `SetRange` defers its write behind the debouncer and returns
//! [`Action::ScheduleTick`] instead; any other gesture flushes the deferred
//! write immediately, since its own write carries the latest range anyway.

use super::store::ChangeOrigin;
use super::sync::Inbound;
use super::debounce::DebounceState;
use crate::app::{Action, AppState};
use crate::domain::{ActiveFilter, Category, Product, SortOption};
use crate::query::{self, QueryString};
use std::time::Instant;

/// Inputs to [`handle_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Select a checkbox filter (no-op if already active).
    Add(ActiveFilter),
    /// Remove an active filter by id.
    Remove(String),
    /// Flip a checkbox filter.
    Toggle(ActiveFilter),
    /// Make `option_id` the only selection in a radio group; empty deselects.
    Select {
        group: String,
        option_id: String,
    },
    /// Slider movement for a range option.
    SetRange {
        id: String,
        min: f64,
        max: f64,
        /// When the movement happened; drives the URL write debounce.
        at: Instant,
    },
    /// Switch an availability toggle.
    SetToggle {
        id: String,
        on: bool,
    },
    /// Clear every filter of one category.
    ClearCategory(Category),
    /// Clear every filter and reset sort, optionally also the search box.
    ClearAll {
        clear_search: bool,
    },
    /// Change the sort order.
    SetSort(SortOption),
    /// Change the search text; `None` or blank clears it.
    SetSearch(Option<String>),
    /// The URL query changed outside our control, or echoes our own write.
    UrlChanged(QueryString),
    /// Timer callback requested through [`Action::ScheduleTick`].
    Tick(Instant),
    /// A new product list arrived from the data provider.
    ProductsLoaded(Vec<Product>),
}

impl Event {
    /// Short name used in tracing spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Toggle(_) => "toggle",
            Self::Select { .. } => "select",
            Self::SetRange { .. } => "set_range",
            Self::SetToggle { .. } => "set_toggle",
            Self::ClearCategory(_) => "clear_category",
            Self::ClearAll { .. } => "clear_all",
            Self::SetSort(_) => "set_sort",
            Self::SetSearch(_) => "set_search",
            Self::UrlChanged(_) => "url_changed",
            Self::Tick(_) => "tick",
            Self::ProductsLoaded(_) => "products_loaded",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The returned flag tells the host whether the panel must re-render.
///
/// ```
/// use storefront_filters::app::{handle_event, Action, AppState, Event};
/// use storefront_filters::domain::{ActiveFilter, Category};
/// use storefront_filters::query::QueryString;
/// use storefront_filters::Catalog;
/// use std::time::Duration;
///
/// let mut state = AppState::new(Catalog::default(), Vec::new(), Duration::ZERO);
/// let cola = ActiveFilter::checkbox(Category::Brand, "Cola", "Cola");
///
/// let (render, actions) = handle_event(&mut state, &Event::Add(cola));
/// assert!(render);
/// assert_eq!(actions, vec![Action::ReplaceUrl(QueryString::new("brand=Cola"))]);
///
/// // The host reports its own write back; nothing happens.
/// let (render, actions) = handle_event(&mut state, &Event::UrlChanged(QueryString::new("brand=Cola")));
/// assert!(!render && actions.is_empty());
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event = event.name()).entered();

    match event {
        Event::Add(filter) => {
            let changed = state.store.add(filter.clone());
            after_gesture(state, changed)
        }
        Event::Remove(id) => {
            let changed = state.store.remove(id);
            after_gesture(state, changed)
        }
        Event::Toggle(filter) => {
            let changed = state.store.toggle(filter.clone());
            after_gesture(state, changed)
        }
        Event::Select { group, option_id } => {
            let changed = state.store.select(group, option_id);
            after_gesture(state, changed)
        }
        Event::SetRange { id, min, max, at } => {
            if !state.store.set_range(id, *min, *max) {
                return (false, vec![]);
            }
            state.refresh();

            if !state.debounce.is_enabled() {
                return (true, write_url(state));
            }

            let wait = state.debounce.schedule(*at);
            tracing::trace!(wait_ms = wait.as_millis(), "range write deferred");
            (true, vec![Action::ScheduleTick(wait)])
        }
        Event::SetToggle { id, on } => {
            let changed = state.store.set_toggle(id, *on);
            after_gesture(state, changed)
        }
        Event::ClearCategory(category) => {
            let changed = state.store.clear_category(*category);
            after_gesture(state, changed)
        }
        Event::ClearAll { clear_search } => {
            let mut changed = state.store.clear_all();
            if *clear_search {
                changed |= state.store.set_search(None);
            }
            after_gesture(state, changed)
        }
        Event::SetSort(sort) => {
            let changed = state.store.set_sort(*sort);
            after_gesture(state, changed)
        }
        Event::SetSearch(query) => {
            let changed = state.store.set_search(query.as_deref());
            after_gesture(state, changed)
        }
        Event::UrlChanged(incoming) => match state.sync.inbound(incoming) {
            Inbound::Echo | Inbound::Unchanged => (false, vec![]),
            Inbound::Apply => {
                if state.debounce.cancel() {
                    tracing::debug!("navigation discards deferred range write");
                }
                let decoded = query::decode(state.store.catalog(), incoming);
                let changed = state.store.replace_state(decoded, ChangeOrigin::Url);

                let echo = state.sync.outbound(query::encode(state.store.state()));
                debug_assert!(echo.is_none(), "url-originated change must not write the url");

                if changed {
                    state.refresh();
                }
                (changed, vec![])
            }
        },
        Event::Tick(now) => match state.debounce.poll(*now) {
            DebounceState::Idle => (false, vec![]),
            DebounceState::Waiting(remaining) => (false, vec![Action::ScheduleTick(remaining)]),
            DebounceState::Due => (false, write_url(state)),
        },
        Event::ProductsLoaded(products) => {
            tracing::debug!(product_count = products.len(), "products loaded");
            if state.products == *products {
                return (false, vec![]);
            }
            state.products.clone_from(products);
            state.refresh();
            (true, vec![])
        }
    }
}

fn after_gesture(state: &mut AppState, changed: bool) -> (bool, Vec<Action>) {
    if !changed {
        return (false, vec![]);
    }
    state.refresh();
    if state.debounce.cancel() {
        tracing::trace!("flushing deferred range write");
    }
    (true, write_url(state))
}

fn write_url(state: &mut AppState) -> Vec<Action> {
    state
        .sync
        .outbound(query::encode(state.store.state()))
        .map(Action::ReplaceUrl)
        .into_iter()
        .collect()
}
