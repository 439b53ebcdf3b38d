//! Filter state types.
//!
//! This module contains the current search/category/unit/sort selection of a
//! list view and the mode it implies.

use super::StateError;
use std::fmt;
use std::str::FromStr;

/// Sentinel accepted for "no restriction" on a select.
pub const ALL: &str = "all";

/// A select value: either unrestricted or one concrete value.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse a select value; `"all"` in any case and blank values mean `All`.
    ///
    pub fn parse(value: &str) -> Selection {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Selected value, or `None` when unrestricted.
    ///
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or(ALL))
    }
}

/// Specifying the supported list orders.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::TitleAsc => "title-asc",
            SortOrder::TitleDesc => "title-desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = StateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title-asc" => Ok(SortOrder::TitleAsc),
            "title-desc" => Ok(SortOrder::TitleDesc),
            _ => Err(StateError::InvalidSort(value.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specifying whether the list shows the server page or a client-filtered set.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Default,
    Filtered,
}

/// Current query parameters of a list view.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search: String,
    pub category: Selection,
    pub unit: Selection,
    pub sort: SortOrder,
}

impl FilterState {
    /// Set the search text, trimmed.
    ///
    pub fn set_search(&mut self, text: &str) -> &mut Self {
        self.search = text.trim().to_string();
        self
    }

    /// Search text folded for comparison.
    ///
    pub fn folded_search(&self) -> String {
        self.search.to_lowercase()
    }

    /// Whether any filter (not the sort) restricts the list.
    ///
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.category.is_all() || !self.unit.is_all()
    }

    pub fn mode(&self) -> Mode {
        if self.is_filtered() {
            Mode::Filtered
        } else {
            Mode::Default
        }
    }

    /// Drop search, category and unit restrictions in one step. The sort is kept.
    ///
    pub fn clear_filters(&mut self) -> &mut Self {
        self.search.clear();
        self.category = Selection::All;
        self.unit = Selection::All;
        self
    }
}
