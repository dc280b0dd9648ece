//! Draft order operations for the Admin API.

use orderline_core::payload::DraftOrderInput;
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::convert_draft_order,
    queries::{DraftOrderComplete, DraftOrderCreate, GetDraftOrder},
};
use crate::shopify::{check_user_errors, types::DraftOrderRef};

impl AdminClient {
    /// Create a draft order.
    ///
    /// # Arguments
    ///
    /// * `input` - Draft order input built from an order draft
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, input), fields(line_items = input.line_items.len()))]
    pub async fn create_draft_order(
        &self,
        input: &DraftOrderInput,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        let variables = super::queries::draft_order_create::Variables {
            input: input.clone(),
        };

        let response = self.execute::<DraftOrderCreate>(variables).await?;

        if let Some(payload) = response.draft_order_create {
            check_user_errors(&payload.user_errors)?;
            if let Some(draft) = payload.draft_order {
                return Ok(convert_draft_order(draft));
            }
        }

        Err(AdminShopifyError::missing_payload("Draft order create failed"))
    }

    /// Complete a draft order, turning it into an order.
    ///
    /// # Arguments
    ///
    /// * `draft_order_id` - Draft order ID (e.g., `gid://shopify/DraftOrder/123`)
    /// * `payment_pending` - Leave the order unpaid instead of marking it paid
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(draft_order_id = %draft_order_id))]
    pub async fn complete_draft_order(
        &self,
        draft_order_id: &str,
        payment_pending: bool,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        let variables = super::queries::draft_order_complete::Variables {
            id: draft_order_id.to_string(),
            payment_pending: Some(payment_pending),
        };

        let response = self.execute::<DraftOrderComplete>(variables).await?;

        if let Some(payload) = response.draft_order_complete {
            check_user_errors(&payload.user_errors)?;
            if let Some(draft) = payload.draft_order {
                return Ok(convert_draft_order(draft));
            }
        }

        Err(AdminShopifyError::missing_payload("Draft order complete failed"))
    }

    /// Get a draft order with its completed order, if any.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the draft does not exist.
    #[instrument(skip(self), fields(draft_order_id = %draft_order_id))]
    pub async fn get_draft_order(
        &self,
        draft_order_id: &str,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        let variables = super::queries::get_draft_order::Variables {
            id: draft_order_id.to_string(),
        };

        let response = self.execute::<GetDraftOrder>(variables).await?;

        response
            .draft_order
            .map(convert_draft_order)
            .ok_or_else(|| AdminShopifyError::NotFound(format!("Draft order {draft_order_id}")))
    }
}
