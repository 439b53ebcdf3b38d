//! List view state module.
//!
//! This module contains the filter state of a list view:
//! - `FilterState` with its `Selection`, `SortOrder` and `Mode` types
//! - Mirroring the state into the page URL query
//! - State error handling

mod error;
mod filter;
pub mod query;

pub use error::StateError;
pub use filter::{FilterState, Mode, Selection, SortOrder, ALL};
