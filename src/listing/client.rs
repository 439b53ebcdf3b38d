//! HTTP client for portal listing endpoints.
//!
//! This module provides a thin wrapper over `reqwest` that issues the `GET`
//! request for a listing endpoint, enforces the configured timeout and
//! conforms the JSON response to the requested item type.

use super::ListingError;
use log::*;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Accepted listing payloads: a bare JSON array or an object wrapping the
/// array in a `data` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListPayload<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Wrapped { data } => data,
        }
    }
}

/// Makes requests to the portal and tries to conform response data to the
/// given item type.
///
#[derive(Clone)]
pub struct Client {
    pub(crate) base_url: Url,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL, applying `timeout` to
    /// every request.
    ///
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ListingError> {
        let base_url = Url::parse(base_url).map_err(|e| ListingError::InvalidUrl {
            url: base_url.to_owned(),
            message: e.to_string(),
        })?;
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Client {
            base_url,
            http_client,
        })
    }

    /// Resolve an endpoint path against the base URL.
    ///
    pub fn endpoint(&self, path: &str) -> Result<Url, ListingError> {
        self.base_url.join(path).map_err(|e| ListingError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            message: e.to_string(),
        })
    }

    /// Return every item of the listing at `path` or an error.
    ///
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ListingError> {
        let url = self.endpoint(path)?;
        debug!("Requesting listing from {}...", url);

        let response = self
            .http_client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Unable to read response"));
            error!(
                "Listing request to {} failed with status {}: {}",
                url, status, message
            );
            return Err(ListingError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let response_bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, &url))?;

        match serde_json::from_slice::<ListPayload<T>>(&response_bytes) {
            Ok(payload) => {
                let items = payload.into_items();
                debug!("Fetched {} items from {}", items.len(), url);
                Ok(items)
            }
            Err(e) => {
                error!(
                    "Failed to deserialize listing response: {}. Response body: {}",
                    e,
                    String::from_utf8_lossy(&response_bytes)
                );
                Err(ListingError::MalformedResponse(e))
            }
        }
    }
}

/// Map a transport failure, singling out timeouts.
fn transport_error(error: reqwest::Error, url: &Url) -> ListingError {
    if error.is_timeout() {
        error!("Listing request to {} timed out", url);
        ListingError::Timeout {
            url: url.to_string(),
        }
    } else {
        error!("Listing request to {} failed: {}", url, error);
        ListingError::Network(error)
    }
}
