//! Portal listings: item types, the HTTP client for listing endpoints and
//! the cached data source the view controller reads from.

mod client;
mod error;
mod resource;
pub mod source;

pub use client::Client;
pub use error::ListingError;
pub use resource::*;
pub use source::{DataSource, ListingSource, RemoteListing};
