//! Conversions from raw response shapes to domain types.

use orderline_core::{
    DraftOrderGid, FulfillmentLineSummary, FulfillmentOrderSummary, LineItemGid, OrderGid,
    RecordedDiscount, RecordedTaxLine, VariantGid,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use super::queries::{fragments, get_fulfillment_orders, order_edit_begin};
use crate::shopify::types::{
    CalculatedLineItem, CalculatedOrder, DraftOrderRef, OrderLine, OrderRef, OrderSummary,
    order_number_from_name,
};

// =============================================================================
// GraphQL
// =============================================================================

pub fn convert_order(order: fragments::OrderNode) -> OrderSummary {
    let currency = order.currency_code.or_else(|| {
        order
            .total_price_set
            .as_ref()
            .map(|bag| bag.shop_money.currency_code.clone())
    });

    OrderSummary {
        id: OrderGid::parse(&order.id),
        order_number: order_number_from_name(&order.name),
        name: order.name,
        total_price: order.total_price_set.map(|bag| bag.shop_money.amount),
        total_tax: order.total_tax_set.map(|bag| bag.shop_money.amount),
        currency,
        tax_lines: order
            .tax_lines
            .into_iter()
            .map(|t| RecordedTaxLine {
                title: t.title,
                rate: t.rate,
                amount: t.price_set.shop_money.amount,
            })
            .collect(),
        discounts: order
            .discount_applications
            .map(|c| c.nodes.into_iter().map(convert_discount_application).collect())
            .unwrap_or_default(),
        line_items: order
            .line_items
            .map(|c| {
                c.nodes
                    .into_iter()
                    .map(|line| OrderLine {
                        id: Some(LineItemGid::parse(&line.id)),
                        title: line.title,
                        quantity: u32::try_from(line.quantity).unwrap_or(0),
                        unit_price: line.original_unit_price_set.map(|bag| bag.shop_money.amount),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn convert_discount_application(node: fragments::DiscountApplicationNode) -> RecordedDiscount {
    let label = node
        .code
        .or(node.title)
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| "Discount".to_string());
    match node.value {
        fragments::PricingValue::Money { amount } => RecordedDiscount {
            label,
            amount: Some(amount),
            percentage: None,
        },
        fragments::PricingValue::Percentage { percentage } => RecordedDiscount {
            label,
            amount: None,
            percentage: Some(percentage),
        },
    }
}

pub fn convert_order_ref(order: fragments::OrderRefNode) -> OrderRef {
    OrderRef {
        id: OrderGid::parse(&order.id),
        name: order.name,
    }
}

pub fn convert_draft_order(draft: fragments::DraftOrderNode) -> DraftOrderRef {
    DraftOrderRef {
        id: DraftOrderGid::parse(&draft.id),
        name: draft.name,
        status: draft.status,
        order: draft.order.map(convert_order_ref),
    }
}

pub fn convert_calculated_order(order: order_edit_begin::CalculatedOrderNode) -> CalculatedOrder {
    CalculatedOrder {
        id: order.id,
        line_items: order
            .line_items
            .nodes
            .into_iter()
            .map(|line| CalculatedLineItem {
                id: line.id,
                quantity: line.quantity,
                variant_id: line.variant.map(|v| VariantGid::parse(&v.id)),
            })
            .collect(),
    }
}

/// Fulfillment orders of an order; a missing order yields none.
///
/// Line quantity is the remaining quantity, or the total when nothing remains.
pub fn convert_fulfillment_orders(
    order: Option<get_fulfillment_orders::OrderNode>,
) -> Vec<FulfillmentOrderSummary> {
    let Some(order) = order else {
        return Vec::new();
    };

    order
        .fulfillment_orders
        .nodes
        .into_iter()
        .map(|fo| FulfillmentOrderSummary {
            id: fo.id,
            status: fo.status,
            request_status: fo.request_status,
            location_id: fo
                .assigned_location
                .and_then(|assigned| assigned.location)
                .map(|location| location.id),
            line_items: fo
                .line_items
                .nodes
                .into_iter()
                .map(|line| FulfillmentLineSummary {
                    id: line.id,
                    quantity: if line.remaining_quantity > 0 {
                        line.remaining_quantity
                    } else {
                        line.total_quantity
                    },
                    line_item_id: line.line_item.as_ref().map(|li| li.id.clone()),
                    title: line.line_item.and_then(|li| li.title),
                })
                .collect(),
        })
        .collect()
}

// =============================================================================
// REST
// =============================================================================

/// `{"order": {...}}` as returned by the REST order endpoints.
#[derive(Debug, Deserialize)]
pub struct RestOrderResponse {
    pub order: RestOrderRecord,
}

#[derive(Debug, Deserialize)]
pub struct RestOrderRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub order_number: Option<u64>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub total_tax: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub tax_lines: Vec<RestTaxLineRecord>,
    #[serde(default)]
    pub discount_codes: Vec<RestDiscountCodeRecord>,
    #[serde(default)]
    pub line_items: Vec<RestLineItemRecord>,
}

#[derive(Debug, Deserialize)]
pub struct RestTaxLineRecord {
    pub title: String,
    #[serde(default)]
    pub rate: Option<f64>,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RestDiscountCodeRecord {
    pub code: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RestLineItemRecord {
    pub id: u64,
    pub title: String,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
}

pub fn convert_rest_order(order: RestOrderRecord) -> OrderSummary {
    OrderSummary {
        id: OrderGid::from_numeric(order.id),
        order_number: order
            .order_number
            .or_else(|| order_number_from_name(&order.name)),
        name: order.name,
        total_price: order.total_price,
        total_tax: order.total_tax,
        currency: order.currency,
        tax_lines: order
            .tax_lines
            .into_iter()
            .map(|t| RecordedTaxLine {
                title: t.title,
                rate: t.rate,
                amount: t.price,
            })
            .collect(),
        discounts: order
            .discount_codes
            .into_iter()
            .map(|d| {
                if d.kind.as_deref() == Some("percentage") {
                    RecordedDiscount {
                        label: d.code,
                        amount: None,
                        percentage: d.amount.and_then(|a| a.to_f64()),
                    }
                } else {
                    RecordedDiscount {
                        label: d.code,
                        amount: d.amount,
                        percentage: None,
                    }
                }
            })
            .collect(),
        line_items: order
            .line_items
            .into_iter()
            .map(|line| OrderLine {
                id: Some(LineItemGid::from_numeric(line.id)),
                title: line.title,
                quantity: line.quantity,
                unit_price: line.price,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_convert_rest_order() {
        let response: RestOrderResponse = serde_json::from_value(json!({
            "order": {
                "id": 450_789_469,
                "name": "#1001",
                "order_number": 1001,
                "total_price": "108.50",
                "total_tax": "8.50",
                "currency": "USD",
                "tax_lines": [{"title": "VAT", "rate": 0.085, "price": "8.50"}],
                "line_items": [{"id": 466_157_049, "title": "Tee", "quantity": 1, "price": "100.00"}]
            }
        }))
        .unwrap();

        let summary = convert_rest_order(response.order);
        assert_eq!(summary.id.as_str(), "gid://shopify/Order/450789469");
        assert_eq!(summary.order_number, Some(1001));
        assert_eq!(summary.tax_lines[0].amount, "8.50".parse().unwrap());
        assert_eq!(summary.line_item_numeric_ids(), vec![466_157_049]);
    }

    #[test]
    fn test_convert_fulfillment_orders_quantity_fallback() {
        let order: get_fulfillment_orders::OrderNode = serde_json::from_value(json!({
            "id": "gid://shopify/Order/1",
            "fulfillmentOrders": {"nodes": [{
                "id": "gid://shopify/FulfillmentOrder/7",
                "status": "OPEN",
                "requestStatus": "UNSUBMITTED",
                "assignedLocation": {"location": {"id": "gid://shopify/Location/3"}},
                "lineItems": {"nodes": [
                    {"id": "gid://shopify/FulfillmentOrderLineItem/1", "remainingQuantity": 2, "totalQuantity": 2,
                     "lineItem": {"id": "gid://shopify/LineItem/10", "title": "Tee"}},
                    {"id": "gid://shopify/FulfillmentOrderLineItem/2", "remainingQuantity": 0, "totalQuantity": 3,
                     "lineItem": null}
                ]}
            }]}
        }))
        .unwrap();

        let converted = convert_fulfillment_orders(Some(order));
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].location_id.as_deref(), Some("gid://shopify/Location/3"));
        assert_eq!(converted[0].line_items[0].quantity, 2);
        assert_eq!(converted[0].line_items[0].title.as_deref(), Some("Tee"));
        assert_eq!(converted[0].line_items[1].quantity, 3);
        assert!(converted[0].line_items[1].line_item_id.is_none());
        assert!(convert_fulfillment_orders(None).is_empty());
    }

    #[test]
    fn test_discount_label_falls_back() {
        let node: fragments::DiscountApplicationNode = serde_json::from_value(json!({
            "value": {"__typename": "MoneyV2", "amount": "5.00", "currencyCode": "USD"}
        }))
        .unwrap();
        let discount = convert_discount_application(node);
        assert_eq!(discount.label, "Discount");
        assert_eq!(discount.amount, Some("5.00".parse().unwrap()));
    }
}
