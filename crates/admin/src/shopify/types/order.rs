//! Order domain types.

use orderline_core::{
    LineItemGid, OrderGid, Payment, RecordedDiscount, RecordedLineItem, RecordedTaxLine,
    format_money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the shop recorded for an order, read from either API surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    /// Order ID.
    pub id: OrderGid,
    /// Order name (e.g., "#1001").
    pub name: String,
    /// Numeric order number, when known.
    pub order_number: Option<u64>,
    /// Total price in shop currency.
    pub total_price: Option<Decimal>,
    /// Total tax in shop currency.
    pub total_tax: Option<Decimal>,
    /// Shop currency code.
    pub currency: Option<String>,
    /// Recorded tax lines.
    pub tax_lines: Vec<RecordedTaxLine>,
    /// Recorded discount applications.
    pub discounts: Vec<RecordedDiscount>,
    /// Line items in shop order.
    pub line_items: Vec<OrderLine>,
}

impl OrderSummary {
    /// Summary carrying only an identity, for calls that return nothing else.
    #[must_use]
    pub fn bare(id: OrderGid, name: String) -> Self {
        let order_number = order_number_from_name(&name);
        Self {
            id,
            name,
            order_number,
            total_price: None,
            total_tax: None,
            currency: None,
            tax_lines: Vec::new(),
            discounts: Vec::new(),
            line_items: Vec::new(),
        }
    }

    /// Numeric REST IDs of the line items, in order.
    #[must_use]
    pub fn line_item_numeric_ids(&self) -> Vec<u64> {
        self.line_items
            .iter()
            .filter_map(|line| line.id.as_ref().and_then(LineItemGid::numeric))
            .collect()
    }
}

/// One line item of an order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Line item ID.
    pub id: Option<LineItemGid>,
    /// Line item title.
    pub title: String,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price before discounts.
    pub unit_price: Option<Decimal>,
}

impl From<&OrderLine> for RecordedLineItem {
    fn from(line: &OrderLine) -> Self {
        Self {
            title: line.title.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Derive the numeric order number from a name such as `#1001`.
#[must_use]
pub fn order_number_from_name(name: &str) -> Option<u64> {
    name.trim().trim_start_matches('#').parse().ok()
}

// =============================================================================
// Transactions
// =============================================================================

/// `{"transaction": {...}}` for `POST /orders/{id}/transactions.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub transaction: TransactionInput,
}

/// A manual sale recorded against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionInput {
    pub kind: &'static str,
    pub status: &'static str,
    pub gateway: &'static str,
    pub source: &'static str,
    pub amount: String,
    pub currency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
}

impl TransactionRequest {
    /// A successful external `sale` through the `manual` gateway.
    #[must_use]
    pub fn sale(payment: &Payment) -> Self {
        Self {
            transaction: TransactionInput {
                kind: "sale",
                status: "success",
                gateway: "manual",
                source: "external",
                amount: format_money(payment.amount),
                currency: payment.currency.code(),
                authorization: payment.code.clone(),
            },
        }
    }
}

/// A transaction as recorded by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Numeric transaction ID.
    pub id: u64,
    /// Transaction kind (sale, capture, refund...).
    pub kind: String,
    /// Transaction status (success, pending, failure...).
    pub status: String,
    /// Amount as a decimal string.
    pub amount: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
}
