//! Catalog sources consumed by the query controller.

use crate::error::{Result, SearchError};
use crate::model::{RawMenuItem, RawRestaurant};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// The two async read operations the engine depends on.
///
/// Implementations must tolerate repeated and concurrent calls; the engine
/// applies no rate limiting of its own.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch menu items matching a free-text hint.
    fn fetch_menu_items(
        &self,
        hint: Option<&str>,
    ) -> impl Future<Output = Result<Vec<RawMenuItem>>> + Send;

    /// Fetch restaurants matching a free-text hint.
    fn fetch_restaurants(
        &self,
        hint: Option<&str>,
    ) -> impl Future<Output = Result<Vec<RawRestaurant>>> + Send;
}

impl<S: CatalogSource> CatalogSource for Arc<S> {
    fn fetch_menu_items(
        &self,
        hint: Option<&str>,
    ) -> impl Future<Output = Result<Vec<RawMenuItem>>> + Send {
        (**self).fetch_menu_items(hint)
    }

    fn fetch_restaurants(
        &self,
        hint: Option<&str>,
    ) -> impl Future<Output = Result<Vec<RawRestaurant>>> + Send {
        (**self).fetch_restaurants(hint)
    }
}

/// An in-memory catalog that ignores the hint and returns everything.
///
/// Filtering and ranking still happen in the engine, so this behaves like a
/// backend that returns its full menu for every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default, alias = "menuItems", alias = "items")]
    pub menu_items: Vec<RawMenuItem>,
    #[serde(default)]
    pub restaurants: Vec<RawRestaurant>,
}

impl StaticCatalog {
    /// Create a catalog from records.
    pub fn new(menu_items: Vec<RawMenuItem>, restaurants: Vec<RawRestaurant>) -> Self {
        Self {
            menu_items,
            restaurants,
        }
    }

    /// Parse a `{ "menu_items": [...], "restaurants": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::InvalidCatalog(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }
}

impl CatalogSource for StaticCatalog {
    async fn fetch_menu_items(&self, _hint: Option<&str>) -> Result<Vec<RawMenuItem>> {
        Ok(self.menu_items.clone())
    }

    async fn fetch_restaurants(&self, _hint: Option<&str>) -> Result<Vec<RawRestaurant>> {
        Ok(self.restaurants.clone())
    }
}
