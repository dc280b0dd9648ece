//! Location listing for the Admin API.

use serde::Deserialize;
use tracing::instrument;

use super::{AdminClient, AdminShopifyError};
use crate::shopify::types::Location;

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    locations: Vec<Location>,
}

impl AdminClient {
    /// List the shop's locations with `GET /locations.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_locations(&self) -> Result<Vec<Location>, AdminShopifyError> {
        let response: LocationsResponse = self.rest_get("/locations.json").await?;
        Ok(response.locations)
    }
}
