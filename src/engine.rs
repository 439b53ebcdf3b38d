//! Filter/sort engine.
//!
//! Pure functions from a full item set and a [`FilterState`] to the ordered
//! visible subset. Nothing here touches the page.

use crate::listing::Listing;
use crate::state::{FilterState, Selection, SortOrder};
use crate::utils::text_processing::strip_markup;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compute the items visible under `state`, in display order.
///
/// The input is never modified; matching items are cloned and sorted stably,
/// so items with equal sort keys keep their relative input order.
pub fn compute_visible<T: Listing>(items: &[T], state: &FilterState) -> Vec<T> {
    let query = state.folded_search();
    let mut visible: Vec<T> = items
        .iter()
        .filter(|item| matches_search(*item, &query))
        .filter(|item| matches_category(*item, &state.category))
        .filter(|item| matches_unit(*item, &state.unit))
        .cloned()
        .collect();
    sort_items(&mut visible, state.sort);
    visible
}

/// Sort items in place by the given order. The sort is stable.
pub fn sort_items<T: Listing>(items: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Newest => items.sort_by(|a, b| b.published_at().cmp(&a.published_at())),
        SortOrder::Oldest => items.sort_by(|a, b| a.published_at().cmp(&b.published_at())),
        SortOrder::TitleAsc => items.sort_by(|a, b| compare_titles(a.title(), b.title())),
        SortOrder::TitleDesc => items.sort_by(|a, b| compare_titles(b.title(), a.title())),
    }
}

/// Empty queries match everything; otherwise the folded title or the plain
/// text of the body must contain the folded query.
fn matches_search<T: Listing>(item: &T, folded_query: &str) -> bool {
    if folded_query.is_empty() {
        return true;
    }
    item.title().to_lowercase().contains(folded_query)
        || strip_markup(item.body()).to_lowercase().contains(folded_query)
}

fn matches_category<T: Listing>(item: &T, category: &Selection) -> bool {
    match category.value() {
        None => true,
        Some(code) => item.category().to_lowercase() == code.to_lowercase(),
    }
}

fn matches_unit<T: Listing>(item: &T, unit: &Selection) -> bool {
    match unit.value() {
        None => true,
        Some(unit) => item.unit() == unit,
    }
}

/// Dictionary-style title comparison. Titles compare on their letters with
/// accents and case removed; accents, then case, only separate titles that
/// are otherwise equal.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// NFD-decomposed, combining marks dropped, lowercased.
fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
