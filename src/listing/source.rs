//! Full-dataset loading with single-flight caching.

use super::{Client, ListingError};
use log::*;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Anything that can produce the complete listing in one call.
///
pub trait ListingSource<T> {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<T>, ListingError>>;
}

/// Listing served by a portal endpoint.
///
pub struct RemoteListing<T> {
    client: Client,
    path: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> RemoteListing<T> {
    pub fn new(client: Client, path: &str) -> Self {
        RemoteListing {
            client,
            path: path.to_owned(),
            _item: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ListingSource<T> for RemoteListing<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, ListingError> {
        self.client.list::<T>(&self.path).await
    }
}

/// Holds the full dataset for the lifetime of a page view.
///
/// The first caller triggers the fetch; callers arriving while it is in
/// flight wait for the same request. A successful result is kept until the
/// source is dropped. A failed fetch is not cached, so a later trigger may
/// try again, but never while another request is outstanding.
///
pub struct DataSource<T, S> {
    source: S,
    cache: OnceCell<Arc<Vec<T>>>,
}

impl<T, S: ListingSource<T>> DataSource<T, S> {
    pub fn new(source: S) -> Self {
        DataSource {
            source,
            cache: OnceCell::new(),
        }
    }

    /// Return the full dataset, fetching it on first use.
    ///
    pub async fn try_full_dataset(&self) -> Result<Arc<Vec<T>>, ListingError> {
        let items = self
            .cache
            .get_or_try_init(|| async {
                info!("Loading full listing...");
                let items = self.source.fetch_all().await?;
                info!("Loaded {} listing items.", items.len());
                Ok::<_, ListingError>(Arc::new(items))
            })
            .await?;
        Ok(Arc::clone(items))
    }

    /// Return the full dataset, or an empty one when it cannot be loaded.
    /// The failure is logged rather than returned.
    ///
    pub async fn full_dataset(&self) -> Arc<Vec<T>> {
        match self.try_full_dataset().await {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to load full listing: {}", e);
                Arc::new(Vec::new())
            }
        }
    }

    /// Whether the full dataset has been loaded.
    ///
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }
}
