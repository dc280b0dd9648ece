use thiserror::Error;

use crate::shopify::AdminShopifyError;

/// Errors that abort an order-creation flow.
#[derive(Debug, Error)]
pub enum OrderFlowError {
    /// A required Admin API call failed.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),

    /// The draft has nothing to order.
    #[error("Order draft has no line items")]
    NoLineItems,

    /// The draft completed but Shopify linked no order to it.
    #[error("Draft order {draft_order_id} completed without an order")]
    MissingOrder {
        /// Draft order ID.
        draft_order_id: String,
    },

    /// The order ID has no numeric tail for the REST surface.
    #[error("Order ID {order_id} has no numeric REST ID")]
    NonNumericOrderId {
        /// Order ID as returned.
        order_id: String,
    },

    /// The edit session has no line item at a draft position, or one for a
    /// different variant.
    #[error("Order {order_id} edit session does not match draft line item {position}")]
    EditLineMismatch {
        /// Order being edited.
        order_id: String,
        /// Zero-based position of the draft line item.
        position: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_errors_display_unchanged() {
        let err = OrderFlowError::from(AdminShopifyError::UserError(
            "lineItems.0.quantity: must be positive".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "User error: lineItems.0.quantity: must be positive"
        );
    }

    #[test]
    fn test_edit_line_mismatch_display() {
        let err = OrderFlowError::EditLineMismatch {
            order_id: "gid://shopify/Order/5".to_string(),
            position: 1,
        };
        assert_eq!(
            err.to_string(),
            "Order gid://shopify/Order/5 edit session does not match draft line item 1"
        );
    }

    #[test]
    fn test_missing_order_display() {
        let err = OrderFlowError::MissingOrder {
            draft_order_id: "gid://shopify/DraftOrder/9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Draft order gid://shopify/DraftOrder/9 completed without an order"
        );
    }
}
