//! Menu item endpoints

use super::{hint_query, ListResponse};
use crate::client::PlatterClient;
use crate::error::ApiResult;
use platter_search::RawMenuItem;

/// Menu items API interface
#[derive(Clone)]
pub struct MenuApi {
    client: PlatterClient,
}

impl MenuApi {
    pub(crate) fn new(client: PlatterClient) -> Self {
        Self { client }
    }

    /// Search menu items
    ///
    /// GET /menu-items?q=<hint>
    pub async fn search(&self, hint: Option<&str>) -> ApiResult<Vec<RawMenuItem>> {
        let response: ListResponse<RawMenuItem> =
            self.client.get("menu-items", &hint_query(hint)).await?;
        Ok(response.into_items())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_server::TestServer;
    use crate::{ClientConfig, PlatterClient};

    #[tokio::test]
    async fn test_search_parses_loose_records() {
        let body = r#"{"data": [
            {"_id": "m1", "name": "Lahmacun", "price": "45,50", "categories": ["Pide & Lahmacun"]},
            {"id": 7, "name": "Ayran", "price": 20}
        ]}"#;
        let server = TestServer::start(vec![(200, body.to_string())]).await;
        let client = PlatterClient::with_config(ClientConfig::default().with_base_url(&server.url)).unwrap();

        let items = client.menu().search(Some("lahmacun")).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name.as_deref(), Some("Lahmacun"));
        assert!(server.requests()[0].starts_with("GET /menu-items?q=lahmacun "));
    }

    #[tokio::test]
    async fn test_search_without_hint_omits_query() {
        let server = TestServer::start(vec![(200, "[]".to_string())]).await;
        let client = PlatterClient::with_config(ClientConfig::default().with_base_url(&server.url)).unwrap();

        assert!(client.menu().search(None).await.unwrap().is_empty());
        assert!(server.requests()[0].starts_with("GET /menu-items HTTP/1.1"));
    }
}
