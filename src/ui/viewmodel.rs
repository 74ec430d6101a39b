//! View model types for the filter panel.
//!
//! View models are display-ready snapshots computed by
//! `AppState::compute_viewmodel()`. They carry no behaviour; the presentation
//! layer renders them and turns gestures back into
//! [`Event`](crate::app::Event)s.

use crate::domain::{Bounds, Category, Kind, SortOption};
use serde::Serialize;

/// Everything needed to render the filter panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPanelViewModel {
    /// One section per category that has options to show.
    pub sections: Vec<SectionView>,
    /// Removable tags for the active filters and search.
    pub tags: Vec<TagView>,
    /// Sort dropdown entries.
    pub sort_options: Vec<SortOptionView>,
    /// Text such as `"12 products found"`.
    pub result_summary: String,
    /// Active filters plus one for a present search query.
    pub total_active: usize,
    /// Shareable query, starting with `?` unless empty.
    pub share_query: String,
}

/// A collapsible filter section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub category: Category,
    pub title: String,
    pub kind: Kind,
    pub options: Vec<OptionView>,
    /// Number of active filters in this section.
    pub active_count: usize,
}

/// A selectable option inside a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub selected: bool,
    /// Slider state for range options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeView>,
}

/// Slider state of a range option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeView {
    /// Declared bounds of the slider track.
    pub bounds: Bounds,
    /// Current thumbs; equal to `bounds` when unset.
    pub selected: Bounds,
}

/// A removable tag.
///
/// `filter_id` is `None` for the search tag, which is cleared with
/// `Event::SetSearch(None)` rather than removed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
    pub filter_id: Option<String>,
    pub text: String,
}

/// One entry of the sort dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOptionView {
    pub value: SortOption,
    pub label: &'static str,
    pub selected: bool,
}

/// Pluralized result count.
///
/// ```
/// use storefront_filters::ui::viewmodel::result_summary;
///
/// assert_eq!(result_summary(1), "1 product found");
/// assert_eq!(result_summary(0), "0 products found");
/// ```
#[must_use]
pub fn result_summary(count: usize) -> String {
    if count == 1 {
        "1 product found".to_string()
    } else {
        format!("{count} products found")
    }
}
