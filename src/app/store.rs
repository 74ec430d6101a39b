//! The filter state store.
//!
//! [`FilterStore`] is the single mutable authority for the
//! [`FilterState`] during a browsing session. Every mutation reports whether
//! it changed anything and, when it did, notifies subscribers exactly once.
//!
//! Mutation semantics per kind:
//!
//! - **checkbox**: [`add`](FilterStore::add) is a no-op for a present id,
//!   [`remove`](FilterStore::remove) deletes by id, [`toggle`](FilterStore::toggle)
//!   flips presence.
//! - **radio**: [`select`](FilterStore::select) replaces the group's
//!   selection; an empty option id deselects.
//! - **range**: [`set_range`](FilterStore::set_range) replaces the value under
//!   the same id, clamped into the option's declared bounds.
//! - **toggle**: [`set_toggle`](FilterStore::set_toggle) adds or removes the
//!   fixed availability filter.

use crate::catalog::Catalog;
use crate::domain::filter::normalize_value;
use crate::domain::{ActiveFilter, Bounds, Category, FilterState, FilterValue, Kind, SortOption};
use std::fmt;
use std::sync::Arc;

/// Where a state change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A shopper gesture.
    User,
    /// A decoded URL (cold load or back/forward navigation).
    Url,
}

/// Handle returned by [`FilterStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Callback invoked after every effective state change.
pub type Subscriber = Box<dyn FnMut(&FilterState, ChangeOrigin)>;

/// Owns the filter state and mediates every mutation.
pub struct FilterStore {
    catalog: Arc<Catalog>,
    state: FilterState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl FilterStore {
    /// Creates an empty store over `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: FilterState::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Catalog used to resolve option ids.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current state snapshot.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Registers a callback run after every effective change.
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use std::sync::Arc;
    /// use storefront_filters::app::FilterStore;
    /// use storefront_filters::domain::SortOption;
    /// use storefront_filters::Catalog;
    ///
    /// let mut store = FilterStore::new(Arc::new(Catalog::default()));
    /// let calls = Rc::new(Cell::new(0));
    /// let seen = Rc::clone(&calls);
    /// store.subscribe(Box::new(move |_, _| seen.set(seen.get() + 1)));
    ///
    /// store.set_sort(SortOption::Newest);
    /// store.set_sort(SortOption::Newest);
    /// assert_eq!(calls.get(), 1);
    /// ```
    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Removes a subscriber. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self, origin: ChangeOrigin) {
        tracing::debug!(
            origin = ?origin,
            filter_count = self.state.active_filters.len(),
            sort = %self.state.sort,
            "filter state changed"
        );
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state, origin);
        }
    }

    fn changed(&mut self, changed: bool) -> bool {
        if changed {
            self.commit(ChangeOrigin::User);
        }
        changed
    }

    /// Adds a filter unless one with the same id is already active.
    ///
    /// The filter is resolved against the catalog first, so a known value
    /// takes the catalog's spelling and label. Filters whose kind does not fit
    /// their category are ignored. A radio filter displaces any other
    /// selection in its group.
    pub fn add(&mut self, filter: ActiveFilter) -> bool {
        let Some(resolved) = self.resolve(&filter) else {
            return false;
        };
        if self.state.is_active(&resolved.id) {
            return false;
        }
        self.insert(resolved)
    }

    fn insert(&mut self, filter: ActiveFilter) -> bool {
        if let Some(group) = filter.group() {
            self.state.active_filters.retain(|_, f| f.group() != Some(group));
        }
        tracing::debug!(filter_id = %filter.id, "adding filter");
        self.state.active_filters.insert(filter.id.clone(), filter);
        self.changed(true)
    }

    /// Canonical form of `filter` under the catalog, or `None` when its
    /// category does not accept its kind.
    fn resolve(&self, filter: &ActiveFilter) -> Option<ActiveFilter> {
        let category = filter.category;
        let resolved = match (&filter.value, self.catalog.kind_for(category)) {
            (
                FilterValue::Checkbox { value } | FilterValue::Radio { value, .. },
                Kind::Checkbox | Kind::Radio,
            ) if !normalize_value(value).is_empty() => Some(self.catalog.text_filter(category, value)),
            (FilterValue::Toggle { toggle }, Kind::Toggle) => {
                Some(self.catalog.toggle_option(*toggle).to_active())
            }
            (FilterValue::Range { bounds }, Kind::Range) => {
                self.range_filter(&filter.id, bounds.min, bounds.max)
            }
            _ => None,
        };

        if resolved.is_none() {
            tracing::warn!(
                filter_id = %filter.id,
                category = %category,
                kind = filter.kind().as_str(),
                "ignoring filter the catalog does not accept"
            );
        }
        resolved
    }

    /// Removes the filter with `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.state.active_filters.remove(id).is_some();
        if removed {
            tracing::debug!(filter_id = %id, "removed filter");
        }
        self.changed(removed)
    }

    /// Adds `filter` if absent, removes it otherwise.
    pub fn toggle(&mut self, filter: ActiveFilter) -> bool {
        match self.resolve(&filter) {
            Some(resolved) if self.state.is_active(&resolved.id) => self.remove(&resolved.id),
            Some(resolved) => self.insert(resolved),
            None => false,
        }
    }

    /// Makes `option_id` the only selection of radio `group`.
    ///
    /// An empty `option_id` clears the group. Ids that are not radio options
    /// of `group` in the catalog are ignored.
    pub fn select(&mut self, group: &str, option_id: &str) -> bool {
        let in_group: Vec<String> = self
            .state
            .filters()
            .filter(|f| f.group() == Some(group))
            .map(|f| f.id.clone())
            .collect();

        if option_id.is_empty() {
            tracing::debug!(group = %group, "deselecting radio group");
            for id in &in_group {
                self.state.active_filters.remove(id);
            }
            return self.changed(!in_group.is_empty());
        }

        let Some(option) = self
            .catalog
            .option(option_id)
            .filter(|o| o.group() == Some(group))
        else {
            tracing::warn!(group = %group, option_id = %option_id, "ignoring selection of unknown radio option");
            return false;
        };

        if in_group.len() == 1 && in_group[0] == option.id {
            return false;
        }

        let filter = option.to_active();
        for id in &in_group {
            self.state.active_filters.remove(id);
        }
        tracing::debug!(group = %group, option_id = %option_id, "selected radio option");
        self.state.active_filters.insert(filter.id.clone(), filter);
        self.changed(true)
    }

    /// Sets the interval of range option `id`.
    ///
    /// The interval is clamped into the option's declared bounds and never
    /// inverted. The previous value under `id` is replaced.
    pub fn set_range(&mut self, id: &str, min: f64, max: f64) -> bool {
        let Some(filter) = self.range_filter(id, min, max) else {
            return false;
        };
        if self.state.active_filters.get(id) == Some(&filter) {
            return false;
        }

        tracing::debug!(option_id = %id, value = ?filter.value, "range updated");
        self.state.active_filters.insert(filter.id.clone(), filter);
        self.changed(true)
    }

    fn range_filter(&self, id: &str, min: f64, max: f64) -> Option<ActiveFilter> {
        let Some(option) = self.catalog.option(id) else {
            tracing::warn!(option_id = %id, "ignoring range for unknown option");
            return None;
        };
        let Some(declared) = option.bounds() else {
            tracing::warn!(option_id = %id, kind = option.kind().as_str(), "option is not a range");
            return None;
        };

        let selected = Bounds::new(min, max).clamp_within(declared);
        let mut filter = option.to_active();
        filter.value = FilterValue::Range { bounds: selected };
        filter.display_value = Some(self.catalog.format_range(selected, declared));
        Some(filter)
    }

    /// Switches availability toggle `id` on or off.
    pub fn set_toggle(&mut self, id: &str, on: bool) -> bool {
        let toggle = crate::domain::AvailabilityToggle::ALL
            .into_iter()
            .map(|t| self.catalog.toggle_option(t))
            .find(|o| o.id == id);

        let Some(option) = toggle else {
            tracing::warn!(option_id = %id, "ignoring unknown toggle");
            return false;
        };

        if on {
            self.add(option.to_active())
        } else {
            self.remove(&option.id)
        }
    }

    /// Removes every filter of `category`.
    pub fn clear_category(&mut self, category: Category) -> bool {
        let before = self.state.active_filters.len();
        self.state.active_filters.retain(|_, f| f.category != category);
        let changed = self.state.active_filters.len() != before;
        if changed {
            tracing::debug!(category = %category, "category cleared");
        }
        self.changed(changed)
    }

    /// Empties every filter and resets the sort order.
    ///
    /// The search query is left alone; callers clear it explicitly with
    /// [`set_search`](Self::set_search).
    pub fn clear_all(&mut self) -> bool {
        let changed = !self.state.active_filters.is_empty() || self.state.sort != SortOption::Featured;
        self.state.active_filters.clear();
        self.state.sort = SortOption::Featured;
        self.changed(changed)
    }

    /// Sets the sort order.
    pub fn set_sort(&mut self, sort: SortOption) -> bool {
        let changed = self.state.sort != sort;
        self.state.sort = sort;
        self.changed(changed)
    }

    /// Sets the search text; blank input clears it.
    pub fn set_search(&mut self, query: Option<&str>) -> bool {
        let query = FilterState::normalize_search(query);
        let changed = self.state.search_query != query;
        self.state.search_query = query;
        self.changed(changed)
    }

    /// Replaces the whole state, as done when a URL is decoded.
    pub fn replace_state(&mut self, state: FilterState, origin: ChangeOrigin) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.commit(origin);
        true
    }

    /// Returns true when a filter with `id` is active.
    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.state.is_active(id)
    }

    /// Active filters of `category`.
    #[must_use]
    pub fn active_by_category(&self, category: Category) -> Vec<&ActiveFilter> {
        self.state.by_category(category)
    }

    /// Active filters plus one for a present search query.
    #[must_use]
    pub fn total_active_count(&self) -> usize {
        self.state.total_active_count()
    }
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("catalog", &self.catalog.name())
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
