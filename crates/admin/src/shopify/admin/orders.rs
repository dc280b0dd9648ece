//! Order creation, lookup and transaction operations for the Admin API.

use orderline_core::Payment;
use orderline_core::payload::{OrderCreateOrderInput, RestOrderRequest, RestOrderTaxUpdate};
use serde::Deserialize;
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{RestOrderResponse, convert_order, convert_rest_order},
    queries::{GetOrder, OrderCreate, order_create::OrderCreateOptionsInput},
};
use crate::shopify::{
    check_user_errors,
    types::{OrderSummary, Transaction, TransactionRequest},
};

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    transaction: Transaction,
}

impl AdminClient {
    // =========================================================================
    // GraphQL
    // =========================================================================

    /// Create an order directly with `orderCreate`.
    ///
    /// Receipts are not sent and inventory is decremented obeying policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, order), fields(line_items = order.line_items.len()))]
    pub async fn create_order(
        &self,
        order: &OrderCreateOrderInput,
    ) -> Result<OrderSummary, AdminShopifyError> {
        let variables = super::queries::order_create::Variables {
            order: order.clone(),
            options: Some(OrderCreateOptionsInput::default()),
        };

        let response = self.execute::<OrderCreate>(variables).await?;

        if let Some(payload) = response.order_create {
            check_user_errors(&payload.user_errors)?;
            if let Some(order) = payload.order {
                return Ok(convert_order(order));
            }
        }

        Err(AdminShopifyError::missing_payload("Order create failed"))
    }

    /// Get an order's totals, tax lines, discounts and line items.
    ///
    /// # Arguments
    ///
    /// * `order_id` - Shopify order ID (e.g., `gid://shopify/Order/123`)
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_summary(
        &self,
        order_id: &str,
    ) -> Result<OrderSummary, AdminShopifyError> {
        let variables = super::queries::get_order::Variables {
            id: order_id.to_string(),
        };

        let response = self.execute::<GetOrder>(variables).await?;

        response
            .order
            .map(convert_order)
            .ok_or_else(|| AdminShopifyError::NotFound(format!("Order {order_id}")))
    }

    // =========================================================================
    // REST
    // =========================================================================

    /// Create an order with `POST /orders.json`.
    ///
    /// This is the only creation call that takes custom tax lines without a
    /// discount object.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Status` with the response body on a
    /// non-success status (e.g., 422 validation errors).
    #[instrument(skip(self, request), fields(line_items = request.order.line_items.len()))]
    pub async fn create_rest_order(
        &self,
        request: &RestOrderRequest,
    ) -> Result<OrderSummary, AdminShopifyError> {
        let response: RestOrderResponse = self.rest_post("/orders.json", request).await?;
        Ok(convert_rest_order(response.order))
    }

    /// Replace an order's tax lines with `PUT /orders/{id}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects the update.
    #[instrument(skip(self, update), fields(order_id = update.order.id))]
    pub async fn update_order_taxes(
        &self,
        update: &RestOrderTaxUpdate,
    ) -> Result<OrderSummary, AdminShopifyError> {
        let path = format!("/orders/{}.json", update.order.id);
        let response: RestOrderResponse = self.rest_put(&path, update).await?;
        Ok(convert_rest_order(response.order))
    }

    /// Get an order with `GET /orders/{id}.json`, including numeric line item IDs.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the order does not exist.
    #[instrument(skip(self))]
    pub async fn get_rest_order(&self, order_id: u64) -> Result<OrderSummary, AdminShopifyError> {
        let path = format!("/orders/{order_id}.json");
        let response: RestOrderResponse = self.rest_get(&path).await?;
        Ok(convert_rest_order(response.order))
    }

    /// Record a manual sale against an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects the transaction.
    #[instrument(skip(self, payment), fields(amount = %payment.amount))]
    pub async fn record_transaction(
        &self,
        order_id: u64,
        payment: &Payment,
    ) -> Result<Transaction, AdminShopifyError> {
        let path = format!("/orders/{order_id}/transactions.json");
        let response: TransactionResponse = self
            .rest_post(&path, &TransactionRequest::sale(payment))
            .await?;
        Ok(response.transaction)
    }
}
