//! Listing fetch error types.

/// Errors that can occur while fetching a listing from the portal.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// Transport layer failed before a response arrived
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Server answered with a non-success status
    #[error("Listing request failed (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Response body is not a list of the expected shape
    #[error("Malformed listing response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("Invalid listing URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl ListingError {
    /// Whether the error originated in the transport rather than the payload.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ListingError::Network(_) | ListingError::Timeout { .. } | ListingError::Status { .. }
        )
    }
}
