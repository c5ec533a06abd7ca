//! Restaurant endpoints

use super::{hint_query, ListResponse};
use crate::client::PlatterClient;
use crate::error::ApiResult;
use platter_search::RawRestaurant;

/// Restaurants API interface
#[derive(Clone)]
pub struct RestaurantsApi {
    client: PlatterClient,
}

impl RestaurantsApi {
    pub(crate) fn new(client: PlatterClient) -> Self {
        Self { client }
    }

    /// Search restaurants
    ///
    /// GET /restaurants?q=<hint>
    pub async fn search(&self, hint: Option<&str>) -> ApiResult<Vec<RawRestaurant>> {
        let response: ListResponse<RawRestaurant> =
            self.client.get("restaurants", &hint_query(hint)).await?;
        Ok(response.into_items())
    }
}
