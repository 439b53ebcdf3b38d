//! Filter state error types.

/// Errors that can occur while changing the filter state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Sort key is not one of the supported orders
    #[error("Invalid sort order: {0}")]
    InvalidSort(String),

    /// Category is not offered by the listing
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Unit is not one of the page's unit options
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}
