//! What the remote platform recorded for a created order.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{DraftOrderGid, OrderGid};
use crate::builder::Strategy;

/// Unified result of an order-creation flow.
///
/// Tax lines and discounts are the ones the shop actually recorded, which can
/// differ from what was requested when the platform merges or recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteOrderConfirmation {
    pub strategy: Strategy,
    pub order_id: OrderGid,
    /// Human-readable name such as `#1042`.
    pub name: String,
    pub order_number: Option<u64>,
    pub total_price: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub currency: Option<String>,
    pub tax_lines: Vec<RecordedTaxLine>,
    pub discounts: Vec<RecordedDiscount>,
    pub line_items: Vec<RecordedLineItem>,
    /// Draft the order was completed from, draft flow only.
    pub draft_order_id: Option<DraftOrderGid>,
    /// Fulfillment routing observed after completion, draft flow only.
    pub fulfillment_orders: Vec<FulfillmentOrderSummary>,
    /// Best-effort steps that failed without aborting the flow.
    pub warnings: Vec<String>,
}

impl RemoteOrderConfirmation {
    /// Sum of recorded tax line amounts.
    #[must_use]
    pub fn recorded_tax_total(&self) -> Decimal {
        self.tax_lines.iter().map(|t| t.amount).sum()
    }

    /// Total quantity across recorded line items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.line_items.iter().map(|l| l.quantity).sum()
    }
}

/// A tax line as stored by the shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedTaxLine {
    pub title: String,
    pub rate: Option<f64>,
    pub amount: Decimal,
}

/// A discount application as stored by the shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedDiscount {
    /// Discount code or manual title.
    pub label: String,
    pub amount: Option<Decimal>,
    pub percentage: Option<f64>,
}

/// A line item as stored by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedLineItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: Option<Decimal>,
}

/// Where part of an order will ship from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentOrderSummary {
    pub id: String,
    pub status: String,
    pub request_status: Option<String>,
    pub location_id: Option<String>,
    pub line_items: Vec<FulfillmentLineSummary>,
}

/// One line of a fulfillment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentLineSummary {
    pub id: String,
    pub line_item_id: Option<String>,
    pub title: Option<String>,
    pub quantity: i64,
}
