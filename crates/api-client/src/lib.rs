//! HTTP catalog source for Platter
//!
//! A resilient client for a catalog backend exposing `menu-items` and
//! `restaurants` list endpoints, plus [`HttpCatalogSource`], which plugs it
//! into the search engine.
//!
//! # Features
//!
//! - **Environment-based configuration**: `PLATTER_API_URL`, `PLATTER_API_KEY`,
//!   `PLATTER_ENV`, `PLATTER_TIMEOUT_SECS`
//! - **Retry with exponential backoff**: automatic retry for transient failures
//! - **Circuit breaker**: stop calling a backend that keeps failing
//! - **Request correlation**: every request carries an `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use platter_api_client::{HttpCatalogSource, PlatterClient};
//! use platter_search::{EngineConfig, QueryController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatterClient::new()?;
//!     let items = client.menu().search(Some("lahmacun")).await?;
//!     println!("{} menu items", items.len());
//!
//!     let controller = QueryController::new(HttpCatalogSource::new(client), EngineConfig::default());
//!     controller.set_query("lahmacun");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod source;

#[cfg(test)]
mod test_server;

pub use client::PlatterClient;
pub use config::{ClientConfig, Environment};
pub use error::{ApiError, ApiResult};
pub use source::HttpCatalogSource;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::PlatterClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{ListResponse, MenuApi, RestaurantsApi};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::source::HttpCatalogSource;
}
