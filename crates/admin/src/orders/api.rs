use async_trait::async_trait;
use orderline_core::payload::{
    DraftOrderInput, OrderCreateOrderInput, RestOrderRequest, RestOrderTaxUpdate,
};
use orderline_core::{FulfillmentOrderSummary, Payment};

use crate::shopify::{
    AdminClient, AdminShopifyError, CalculatedOrder, DraftOrderRef, MetafieldInput,
    OrderEditAppliedDiscountInput, OrderRef, OrderSummary, Transaction,
};

/// The Admin API calls the order flows depend on.
///
/// Every method maps one-to-one onto an [`AdminClient`] operation.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_draft_order(
        &self,
        input: &DraftOrderInput,
    ) -> Result<DraftOrderRef, AdminShopifyError>;

    async fn complete_draft_order(
        &self,
        draft_order_id: &str,
        payment_pending: bool,
    ) -> Result<DraftOrderRef, AdminShopifyError>;

    async fn get_draft_order(&self, draft_order_id: &str)
    -> Result<DraftOrderRef, AdminShopifyError>;

    async fn create_order(
        &self,
        order: &OrderCreateOrderInput,
    ) -> Result<OrderSummary, AdminShopifyError>;

    async fn create_rest_order(
        &self,
        request: &RestOrderRequest,
    ) -> Result<OrderSummary, AdminShopifyError>;

    async fn update_order_taxes(
        &self,
        update: &RestOrderTaxUpdate,
    ) -> Result<OrderSummary, AdminShopifyError>;

    async fn get_rest_order(&self, order_id: u64) -> Result<OrderSummary, AdminShopifyError>;

    async fn get_order_summary(&self, order_id: &str) -> Result<OrderSummary, AdminShopifyError>;

    async fn order_edit_begin(&self, order_id: &str)
    -> Result<CalculatedOrder, AdminShopifyError>;

    async fn order_edit_add_line_item_discount(
        &self,
        calculated_order_id: &str,
        line_item_id: &str,
        discount: &OrderEditAppliedDiscountInput,
    ) -> Result<(), AdminShopifyError>;

    async fn order_edit_commit(
        &self,
        calculated_order_id: &str,
        staff_note: Option<&str>,
    ) -> Result<OrderRef, AdminShopifyError>;

    async fn set_order_metafield(
        &self,
        order_id: &str,
        metafield: &MetafieldInput,
    ) -> Result<(), AdminShopifyError>;

    async fn get_fulfillment_orders(
        &self,
        order_id: &str,
    ) -> Result<Vec<FulfillmentOrderSummary>, AdminShopifyError>;

    async fn record_transaction(
        &self,
        order_id: u64,
        payment: &Payment,
    ) -> Result<Transaction, AdminShopifyError>;
}

#[async_trait]
impl OrderApi for AdminClient {
    async fn create_draft_order(
        &self,
        input: &DraftOrderInput,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        Self::create_draft_order(self, input).await
    }

    async fn complete_draft_order(
        &self,
        draft_order_id: &str,
        payment_pending: bool,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        Self::complete_draft_order(self, draft_order_id, payment_pending).await
    }

    async fn get_draft_order(
        &self,
        draft_order_id: &str,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        Self::get_draft_order(self, draft_order_id).await
    }

    async fn create_order(
        &self,
        order: &OrderCreateOrderInput,
    ) -> Result<OrderSummary, AdminShopifyError> {
        Self::create_order(self, order).await
    }

    async fn create_rest_order(
        &self,
        request: &RestOrderRequest,
    ) -> Result<OrderSummary, AdminShopifyError> {
        Self::create_rest_order(self, request).await
    }

    async fn update_order_taxes(
        &self,
        update: &RestOrderTaxUpdate,
    ) -> Result<OrderSummary, AdminShopifyError> {
        Self::update_order_taxes(self, update).await
    }

    async fn get_rest_order(&self, order_id: u64) -> Result<OrderSummary, AdminShopifyError> {
        Self::get_rest_order(self, order_id).await
    }

    async fn get_order_summary(&self, order_id: &str) -> Result<OrderSummary, AdminShopifyError> {
        Self::get_order_summary(self, order_id).await
    }

    async fn order_edit_begin(
        &self,
        order_id: &str,
    ) -> Result<CalculatedOrder, AdminShopifyError> {
        Self::order_edit_begin(self, order_id).await
    }

    async fn order_edit_add_line_item_discount(
        &self,
        calculated_order_id: &str,
        line_item_id: &str,
        discount: &OrderEditAppliedDiscountInput,
    ) -> Result<(), AdminShopifyError> {
        Self::order_edit_add_line_item_discount(self, calculated_order_id, line_item_id, discount)
            .await
    }

    async fn order_edit_commit(
        &self,
        calculated_order_id: &str,
        staff_note: Option<&str>,
    ) -> Result<OrderRef, AdminShopifyError> {
        Self::order_edit_commit(self, calculated_order_id, staff_note).await
    }

    async fn set_order_metafield(
        &self,
        order_id: &str,
        metafield: &MetafieldInput,
    ) -> Result<(), AdminShopifyError> {
        Self::set_order_metafield(self, order_id, metafield).await
    }

    async fn get_fulfillment_orders(
        &self,
        order_id: &str,
    ) -> Result<Vec<FulfillmentOrderSummary>, AdminShopifyError> {
        Self::get_fulfillment_orders(self, order_id).await
    }

    async fn record_transaction(
        &self,
        order_id: u64,
        payment: &Payment,
    ) -> Result<Transaction, AdminShopifyError> {
        Self::record_transaction(self, order_id, payment).await
    }
}
