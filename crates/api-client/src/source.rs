//! [`CatalogSource`] backed by the catalog HTTP API.

use crate::client::PlatterClient;
use crate::error::ApiError;
use platter_search::{CatalogSource, RawMenuItem, RawRestaurant, SearchError, SourceKind};

/// Feeds the search engine from the remote catalog API.
///
/// Client failures are reported as [`SearchError::SourceFetchFailed`] tagged
/// with the source that failed; retries and circuit breaking happen below.
#[derive(Clone)]
pub struct HttpCatalogSource {
    client: PlatterClient,
}

impl HttpCatalogSource {
    /// Wrap a configured client
    pub fn new(client: PlatterClient) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &PlatterClient {
        &self.client
    }
}

fn fetch_error(kind: SourceKind, err: ApiError) -> SearchError {
    SearchError::fetch_failed(kind, err.to_string())
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch_menu_items(
        &self,
        hint: Option<&str>,
    ) -> platter_search::Result<Vec<RawMenuItem>> {
        self.client
            .menu()
            .search(hint)
            .await
            .map_err(|e| fetch_error(SourceKind::Menu, e))
    }

    async fn fetch_restaurants(
        &self,
        hint: Option<&str>,
    ) -> platter_search::Result<Vec<RawRestaurant>> {
        self.client
            .restaurants()
            .search(hint)
            .await
            .map_err(|e| fetch_error(SourceKind::Restaurants, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::TestServer;
    use crate::ClientConfig;
    use platter_core::retry::RetryConfig;
    use platter_search::{Catalog, FieldWeights, QueryState};

    fn source_for(server: &TestServer) -> HttpCatalogSource {
        let config = ClientConfig::default()
            .with_base_url(&server.url)
            .with_retry(RetryConfig::no_retry());
        HttpCatalogSource::new(PlatterClient::with_config(config).unwrap())
    }

    #[tokio::test]
    async fn test_fetches_feed_the_catalog() {
        let server = TestServer::start(vec![
            (200, r#"[{"id": "m1", "name": "Kuzu Tandır", "restaurant_id": "r1"}]"#.to_string()),
            (200, r#"{"data": [{"id": "r1", "name": "Hünkar", "delivery_time": "35-45"}]}"#.to_string()),
        ])
        .await;
        let source = source_for(&server);

        let menu = source.fetch_menu_items(Some("tandir")).await.unwrap();
        let restaurants = source.fetch_restaurants(Some("tandir")).await.unwrap();
        let catalog = Catalog::build(menu, restaurants);

        let results = catalog.search(&QueryState::new("tandır"), &FieldWeights::default(), None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].restaurant_name.as_deref(), Some("Hünkar"));
        assert_eq!(results[0].eta_minutes, 35);
    }

    #[tokio::test]
    async fn test_failure_is_tagged_with_source() {
        let server = TestServer::start(vec![(503, "maintenance".to_string())]).await;
        let source = source_for(&server);

        let err = source.fetch_restaurants(None).await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::SourceFetchFailed { source_kind: SourceKind::Restaurants, .. }
        ));
        assert!(err.to_string().contains("maintenance"));
    }
}
