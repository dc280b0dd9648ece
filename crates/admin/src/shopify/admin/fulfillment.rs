//! Fulfillment order lookups for the Admin API.

use orderline_core::FulfillmentOrderSummary;
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, conversions::convert_fulfillment_orders,
    queries::GetFulfillmentOrders,
};

impl AdminClient {
    /// Get fulfillment orders for an order.
    ///
    /// Shopify routes new orders asynchronously, so this can be empty for a
    /// few seconds after creation.
    ///
    /// # Arguments
    ///
    /// * `order_id` - Shopify order ID
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_fulfillment_orders(
        &self,
        order_id: &str,
    ) -> Result<Vec<FulfillmentOrderSummary>, AdminShopifyError> {
        let variables = super::queries::get_fulfillment_orders::Variables {
            order_id: order_id.to_string(),
        };

        let response = self.execute::<GetFulfillmentOrders>(variables).await?;

        Ok(convert_fulfillment_orders(response.order))
    }
}
