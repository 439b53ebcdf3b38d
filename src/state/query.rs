//! Mirroring the filter state into the page URL.
//!
//! Parameters are only present when they differ from the default, so a
//! shared link reproduces the filtered view and a bare link shows the
//! server's default page.

use super::{FilterState, Selection, SortOrder};
use log::*;
use reqwest::Url;

pub const SEARCH_PARAM: &str = "q";
pub const CATEGORY_PARAM: &str = "category";
pub const UNIT_PARAM: &str = "unit";
pub const SORT_PARAM: &str = "sort";
/// Server-side pagination parameter, meaningless while filtering client-side.
pub const PAGE_PARAM: &str = "page";

const OWNED_PARAMS: [&str; 4] = [SEARCH_PARAM, CATEGORY_PARAM, UNIT_PARAM, SORT_PARAM];

impl FilterState {
    /// Restore the state from the query of a page URL. Absent parameters
    /// keep their defaults; an unreadable sort falls back to the default.
    ///
    pub fn from_url(url: &Url) -> FilterState {
        let mut state = FilterState::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                SEARCH_PARAM => {
                    state.set_search(&value);
                }
                CATEGORY_PARAM => state.category = Selection::parse(&value),
                UNIT_PARAM => state.unit = Selection::parse(&value),
                SORT_PARAM => match value.parse::<SortOrder>() {
                    Ok(sort) => state.sort = sort,
                    Err(e) => warn!("Ignoring sort parameter in page URL: {}", e),
                },
                _ => (),
            }
        }
        state
    }

    /// Return `url` with its query rewritten to reflect this state.
    ///
    /// Unrelated parameters are preserved; the pagination parameter is
    /// dropped while any filter is active.
    ///
    pub fn apply_to_url(&self, url: &Url) -> Url {
        let filtered = self.is_filtered();
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| {
                !OWNED_PARAMS.contains(&key.as_ref()) && !(filtered && key == PAGE_PARAM)
            })
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if !self.search.is_empty() {
            pairs.push((SEARCH_PARAM.to_string(), self.search.clone()));
        }
        if let Some(category) = self.category.value() {
            pairs.push((CATEGORY_PARAM.to_string(), category.to_string()));
        }
        if let Some(unit) = self.unit.value() {
            pairs.push((UNIT_PARAM.to_string(), unit.to_string()));
        }
        if self.sort != SortOrder::default() {
            pairs.push((SORT_PARAM.to_string(), self.sort.as_str().to_string()));
        }

        let mut next = url.clone();
        next.set_query(None);
        if !pairs.is_empty() {
            next.query_pairs_mut().extend_pairs(pairs);
        }
        next
    }
}
