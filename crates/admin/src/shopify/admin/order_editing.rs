//! Order editing operations for the Admin API.

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{convert_calculated_order, convert_order_ref},
    queries::{OrderEditAddLineItemDiscount, OrderEditBegin, OrderEditCommit},
};
use crate::shopify::{
    check_user_errors,
    types::{CalculatedOrder, OrderEditAppliedDiscountInput, OrderRef},
};

impl AdminClient {
    /// Begin an order edit session.
    ///
    /// This starts a new order edit session and returns a `CalculatedOrder`
    /// which tracks the proposed changes until they are committed.
    ///
    /// # Arguments
    ///
    /// * `order_id` - Shopify order ID (e.g., `gid://shopify/Order/123`)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order_edit_begin(
        &self,
        order_id: &str,
    ) -> Result<CalculatedOrder, AdminShopifyError> {
        let variables = super::queries::order_edit_begin::Variables {
            id: order_id.to_string(),
        };

        let response = self.execute::<OrderEditBegin>(variables).await?;

        if let Some(payload) = response.order_edit_begin {
            check_user_errors(&payload.user_errors)?;
            if let Some(calc_order) = payload.calculated_order {
                return Ok(convert_calculated_order(calc_order));
            }
        }

        Err(AdminShopifyError::missing_payload("Order edit begin failed"))
    }

    /// Apply a discount to a line item in an order edit.
    ///
    /// # Arguments
    ///
    /// * `calculated_order_id` - The ID from `order_edit_begin`
    /// * `line_item_id` - Calculated line item ID
    /// * `discount` - Percentage or fixed-per-unit discount
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, discount), fields(calc_order_id = %calculated_order_id, line_item_id = %line_item_id))]
    pub async fn order_edit_add_line_item_discount(
        &self,
        calculated_order_id: &str,
        line_item_id: &str,
        discount: &OrderEditAppliedDiscountInput,
    ) -> Result<(), AdminShopifyError> {
        let variables = super::queries::order_edit_add_line_item_discount::Variables {
            id: calculated_order_id.to_string(),
            line_item_id: line_item_id.to_string(),
            discount: discount.clone(),
        };

        let response = self
            .execute::<OrderEditAddLineItemDiscount>(variables)
            .await?;

        if let Some(payload) = response.order_edit_add_line_item_discount {
            check_user_errors(&payload.user_errors)?;
            return Ok(());
        }

        Err(AdminShopifyError::missing_payload(
            "Order edit add line item discount failed",
        ))
    }

    /// Commit an order edit, applying all staged changes.
    ///
    /// The customer is not notified.
    ///
    /// # Arguments
    ///
    /// * `calculated_order_id` - The ID from `order_edit_begin`
    /// * `staff_note` - Optional note recorded with the edit
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(calc_order_id = %calculated_order_id))]
    pub async fn order_edit_commit(
        &self,
        calculated_order_id: &str,
        staff_note: Option<&str>,
    ) -> Result<OrderRef, AdminShopifyError> {
        let variables = super::queries::order_edit_commit::Variables {
            id: calculated_order_id.to_string(),
            notify_customer: Some(false),
            staff_note: staff_note.map(String::from),
        };

        let response = self.execute::<OrderEditCommit>(variables).await?;

        if let Some(payload) = response.order_edit_commit {
            check_user_errors(&payload.user_errors)?;
            if let Some(order) = payload.order {
                return Ok(convert_order_ref(order));
            }
        }

        Err(AdminShopifyError::missing_payload("Order edit commit failed"))
    }
}
