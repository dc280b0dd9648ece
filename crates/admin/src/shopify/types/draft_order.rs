//! Draft order domain types.

use orderline_core::{DraftOrderGid, OrderGid};
use serde::Serialize;

/// A draft order and, once completed, the order it became.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftOrderRef {
    /// Draft order ID.
    pub id: DraftOrderGid,
    /// Draft name (e.g., "#D12").
    pub name: String,
    /// Draft status (OPEN, INVOICE_SENT, COMPLETED).
    pub status: Option<String>,
    /// The order created on completion.
    pub order: Option<OrderRef>,
}

/// Minimal reference to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRef {
    /// Order ID.
    pub id: OrderGid,
    /// Order name (e.g., "#1001").
    pub name: String,
}
