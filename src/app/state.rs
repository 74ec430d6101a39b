//! Application state management and view model computation.
//!
//! [`AppState`] bundles everything a filter panel session needs: the
//! [`FilterStore`], the URL synchronizer, the range debouncer, the current
//! product list and the evaluation derived from both. The evaluation is
//! recomputed by [`AppState::refresh`] whenever filters or products change, so
//! view models are cheap to build.

use super::debounce::Debouncer;
use super::store::{ChangeOrigin, FilterStore};
use super::sync::UrlSync;
use crate::catalog::Catalog;
use crate::domain::{Category, FilterValue, Kind, Product, SortOption};
use crate::eval::{self, Evaluation};
use crate::query::{self, QueryString};
use crate::ui::viewmodel::{
    result_summary, FilterPanelViewModel, OptionView, RangeView, SectionView, SortOptionView,
    TagView,
};
use std::sync::Arc;
use std::time::Duration;

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    /// Filter state and its mutation rules.
    pub store: FilterStore,

    /// Store/URL loop prevention.
    pub sync: UrlSync,

    /// Deferred URL write for range sliders.
    pub debounce: Debouncer,

    /// Products as supplied by the data provider, in featured order.
    pub products: Vec<Product>,

    /// Products matching the current filter state, sorted.
    ///
    /// Recomputed by `refresh()`.
    pub evaluation: Evaluation,
}

impl AppState {
    /// Creates a state with no filters applied.
    ///
    /// `range_debounce` is the quiet period before a range change is written
    /// to the URL; zero writes immediately.
    #[must_use]
    pub fn new(catalog: Catalog, products: Vec<Product>, range_debounce: Duration) -> Self {
        let mut state = Self {
            store: FilterStore::new(Arc::new(catalog)),
            sync: UrlSync::default(),
            debounce: Debouncer::new(range_debounce),
            products,
            evaluation: Evaluation::default(),
        };
        state.refresh();
        state
    }

    /// Creates a state from the URL the page was loaded with.
    ///
    /// The URL is decoded into the store and remembered as already written,
    /// so the cold load produces no URL write.
    #[must_use]
    pub fn from_url(
        catalog: Catalog,
        products: Vec<Product>,
        range_debounce: Duration,
        initial: &QueryString,
    ) -> Self {
        let _span = tracing::debug_span!("cold_load", query = %initial).entered();

        let mut state = Self::new(catalog, products, range_debounce);
        let decoded = query::decode(state.store.catalog(), initial);
        if state.store.replace_state(decoded, ChangeOrigin::Url) {
            state.refresh();
        }
        state.sync = UrlSync::new(initial.clone());
        state
    }

    /// Catalog behind the store.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    /// Re-evaluates the products against the current filter state.
    pub fn refresh(&mut self) {
        self.evaluation = eval::evaluate(&self.products, self.store.state());
    }

    /// Shareable query for the current state.
    #[must_use]
    pub fn share_query(&self) -> QueryString {
        query::encode(self.store.state())
    }

    /// Computes the filter panel view model from the current state.
    ///
    /// Brand options are narrowed to brands present in the loaded products;
    /// before any product arrives every catalog option is shown. Sections with
    /// no options are omitted.
    #[must_use]
    pub fn compute_viewmodel(&self) -> FilterPanelViewModel {
        let sections = Category::ALL
            .into_iter()
            .filter_map(|category| self.compute_section(category))
            .collect();

        FilterPanelViewModel {
            sections,
            tags: self.compute_tags(),
            sort_options: self.compute_sort_options(),
            result_summary: result_summary(self.evaluation.match_count),
            total_active: self.store.total_active_count(),
            share_query: self.share_query().to_url_suffix(),
        }
    }

    fn compute_section(&self, category: Category) -> Option<SectionView> {
        let catalog = self.catalog();
        let options = if category == Category::Brand && !self.products.is_empty() {
            catalog.options_present_in(category, &self.products)
        } else {
            catalog.options_for(category)
        };

        if options.is_empty() {
            return None;
        }

        let state = self.store.state();
        let options = options
            .into_iter()
            .map(|option| {
                let active = state.active_filters.get(&option.id);
                let range = option.bounds().map(|bounds| RangeView {
                    bounds,
                    selected: match active.map(|f| &f.value) {
                        Some(FilterValue::Range { bounds: selected }) => *selected,
                        _ => bounds,
                    },
                });
                OptionView {
                    id: option.id.clone(),
                    label: option.label.clone(),
                    selected: active.is_some(),
                    range,
                }
            })
            .collect();

        Some(SectionView {
            category,
            title: category.title().to_string(),
            kind: catalog.kind_for(category),
            options,
            active_count: self.store.active_by_category(category).len(),
        })
    }

    fn compute_tags(&self) -> Vec<TagView> {
        let state = self.store.state();
        let mut tags: Vec<TagView> = Category::ALL
            .into_iter()
            .flat_map(|category| state.by_category(category))
            .map(|filter| TagView {
                filter_id: Some(filter.id.clone()),
                text: match filter.kind() {
                    Kind::Range => format!("{}: {}", filter.label, filter.tag_text()),
                    _ => filter.tag_text().to_string(),
                },
            })
            .collect();

        if let Some(search) = &state.search_query {
            tags.push(TagView {
                filter_id: None,
                text: format!("\"{search}\""),
            });
        }

        tags
    }

    fn compute_sort_options(&self) -> Vec<SortOptionView> {
        let current = self.store.state().sort;
        SortOption::ALL
            .into_iter()
            .map(|value| SortOptionView {
                value,
                label: value.label(),
                selected: value == current,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, brand: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("{brand} Original"),
            price,
            product_type: "Soda".to_string(),
            size: "0.33L".to_string(),
            brand: brand.to_string(),
            package: Some("Can".to_string()),
            in_stock: true,
            returnable: true,
            created_at: None,
        }
    }

    #[test]
    fn cold_load_decodes_without_writing() {
        let products = vec![product("1", "Olipop", 2.5), product("2", "Sprite", 1.0)];
        let initial = QueryString::new("?brand=Olipop");
        let mut state = AppState::from_url(Catalog::default(), products, Duration::ZERO, &initial);

        assert_eq!(state.evaluation.match_count, 1);
        let canonical = state.share_query();
        assert_eq!(state.sync.outbound(canonical), None);
    }

    #[test]
    fn viewmodel_reflects_filters_and_results() {
        let products = vec![product("1", "Olipop", 2.5), product("2", "Sprite", 1.0)];
        let initial = QueryString::new("brand=Olipop&price=2-50&sort=price-low&q=original");
        let state = AppState::from_url(Catalog::default(), products, Duration::ZERO, &initial);
        let panel = state.compute_viewmodel();

        let brands = panel
            .sections
            .iter()
            .find(|s| s.category == Category::Brand)
            .map(|s| s.options.iter().map(|o| (o.label.as_str(), o.selected)).collect::<Vec<_>>());
        assert_eq!(brands, Some(vec![("Sprite", false), ("Olipop", true)]));

        let price = panel
            .sections
            .iter()
            .find(|s| s.category == Category::Price)
            .and_then(|s| s.options[0].range);
        assert_eq!(
            price.map(|r| (r.bounds.max, r.selected.min)),
            Some((50.0, 2.0))
        );

        let tags: Vec<&str> = panel.tags.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(tags, vec!["Olipop", "Price: €2 - €50+", "\"original\""]);
        assert_eq!(panel.total_active, 3);
        assert_eq!(panel.result_summary, "1 product found");
        assert!(panel.sort_options.iter().any(|o| o.selected && o.value == SortOption::PriceLow));
        assert_eq!(panel.share_query, "?brand=Olipop&price=2-50&sort=price-low&q=original");
    }

    #[test]
    fn empty_catalog_sections_are_omitted() {
        let catalog = Catalog::from_toml_str("name = \"bare\"").unwrap();
        let state = AppState::new(catalog, Vec::new(), Duration::ZERO);
        let panel = state.compute_viewmodel();
        assert!(panel.sections.is_empty());
        assert_eq!(panel.result_summary, "0 products found");
    }
}
