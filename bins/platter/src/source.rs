//! Catalog source selection: a local JSON file or the catalog API.

use crate::settings::Settings;
use platter_api_client::{ClientConfig, HttpCatalogSource, PlatterClient};
use platter_core::{Error, ErrorCode, ResultExt};
use platter_search::{CatalogSource, RawMenuItem, RawRestaurant, StaticCatalog};
use std::path::Path;

pub enum CliSource {
    Local(StaticCatalog),
    Remote(HttpCatalogSource),
}

/// Open the local catalog when a path is given, otherwise the configured API.
pub fn open(catalog: Option<&Path>, settings: &Settings) -> platter_core::Result<CliSource> {
    match catalog {
        Some(path) => {
            if !path.exists() {
                return Err(Error::file_not_found(path));
            }
            let catalog = StaticCatalog::from_file(path)
                .map_err(|e| Error::new(ErrorCode::InvalidFormat, e.to_string()))
                .context(format!("loading catalog {}", path.display()))
                .with_suggestion(r#"Expected {"menu_items": [...], "restaurants": [...]}"#)?;
            tracing::debug!(
                path = %path.display(),
                menu_items = catalog.menu_items.len(),
                restaurants = catalog.restaurants.len(),
                "using local catalog"
            );
            Ok(CliSource::Local(catalog))
        }
        None => {
            let config = ClientConfig::from_settings(&settings.api)?;
            tracing::debug!(base_url = %config.base_url, env = ?config.environment, "using catalog API");
            let client = PlatterClient::with_config(config)?;
            Ok(CliSource::Remote(HttpCatalogSource::new(client)))
        }
    }
}

impl CatalogSource for CliSource {
    async fn fetch_menu_items(&self, hint: Option<&str>) -> platter_search::Result<Vec<RawMenuItem>> {
        match self {
            Self::Local(catalog) => catalog.fetch_menu_items(hint).await,
            Self::Remote(api) => api.fetch_menu_items(hint).await,
        }
    }

    async fn fetch_restaurants(
        &self,
        hint: Option<&str>,
    ) -> platter_search::Result<Vec<RawRestaurant>> {
        match self {
            Self::Local(catalog) => catalog.fetch_restaurants(hint).await,
            Self::Remote(api) => api.fetch_restaurants(hint).await,
        }
    }
}
