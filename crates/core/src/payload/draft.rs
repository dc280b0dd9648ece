//! `draftOrderCreate` input.
//!
//! Draft orders take the original unit price plus at most one applied
//! discount per line, and one order-level applied discount. They do not take
//! custom tax lines.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{AttributeInput, MailingAddressInput};
use crate::builder::{build_line_item, build_order_level_discount, order_discount_description};
use crate::types::{DiscountSpec, DiscountValue, OrderDraft, format_money};

/// `DraftOrderInput`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub line_items: Vec<DraftOrderLineItemInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_discount: Option<DraftOrderAppliedDiscountInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<MailingAddressInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<MailingAddressInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_line: Option<ShippingLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_attributes: Vec<AttributeInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchasing_entity: Option<PurchasingEntityInput>,
}

/// `DraftOrderLineItemInput`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderLineItemInput {
    pub variant_id: String,
    pub quantity: u32,
    pub original_unit_price: String,
    pub taxable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_discount: Option<DraftOrderAppliedDiscountInput>,
}

/// `DraftOrderAppliedDiscountInput`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderAppliedDiscountInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value_type: DiscountValueType,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

impl DraftOrderAppliedDiscountInput {
    fn from_spec(spec: &DiscountSpec, description: Option<String>) -> Self {
        let (value_type, value) = match spec.value {
            DiscountValue::Percentage(p) => (DiscountValueType::Percentage, p),
            DiscountValue::FixedAmount(a) => (DiscountValueType::FixedAmount, a),
        };
        Self {
            title: spec.title.clone(),
            description,
            value_type,
            value,
        }
    }
}

/// `DraftOrderAppliedDiscountType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountValueType {
    Percentage,
    FixedAmount,
}

/// `ShippingLineInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingLineInput {
    pub title: String,
    pub price: String,
}

/// `PurchasingEntityInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasingEntityInput {
    pub customer_id: String,
}

/// Shape a draft for `draftOrderCreate`.
#[must_use]
pub fn draft_order_input(draft: &OrderDraft) -> DraftOrderInput {
    let line_items = draft
        .line_items
        .iter()
        .map(|item| {
            let priced = build_line_item(item);
            DraftOrderLineItemInput {
                variant_id: item.variant_id.to_string(),
                quantity: item.quantity,
                original_unit_price: format_money(priced.original_price),
                taxable: item.taxable,
                applied_discount: priced
                    .combined_discount()
                    .map(|spec| DraftOrderAppliedDiscountInput::from_spec(&spec, priced.discount_summary.clone())),
            }
        })
        .collect();

    let applied_discount = build_order_level_discount(draft).map(|spec| {
        let description = if draft.effective_discounts().next().is_some() {
            None
        } else {
            order_discount_description(draft)
        };
        DraftOrderAppliedDiscountInput::from_spec(&spec, description)
    });

    DraftOrderInput {
        email: draft.email.as_ref().map(ToString::to_string),
        line_items,
        applied_discount,
        shipping_address: draft.shipping_address.as_ref().map(Into::into),
        billing_address: draft.billing_address.as_ref().map(Into::into),
        shipping_line: draft.shipping.as_ref().map(|s| ShippingLineInput {
            title: s.title.clone(),
            price: format_money(s.price),
        }),
        note: draft.note.clone(),
        tags: draft.tags.clone(),
        custom_attributes: draft.note_attributes.iter().map(Into::into).collect(),
        purchasing_entity: draft
            .customer
            .as_ref()
            .and_then(|c| c.id.as_ref())
            .map(|id| PurchasingEntityInput {
                customer_id: id.to_string(),
            }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{CustomerGid, CustomerRef, Email, LineItem, ShippingCharge, VariantGid};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_percentage_item_discount() {
        let mut item = LineItem::new(VariantGid::parse("11"), 1, dec("100.00"));
        item.discounts.push(DiscountSpec::percentage("Summer", dec("20")));
        let draft = OrderDraft {
            email: Some(Email::parse("ada@example.com").unwrap()),
            line_items: vec![item],
            ..OrderDraft::default()
        };

        let json = serde_json::to_value(draft_order_input(&draft)).unwrap();
        assert_eq!(
            json,
            json!({
                "email": "ada@example.com",
                "lineItems": [{
                    "variantId": "gid://shopify/ProductVariant/11",
                    "quantity": 1,
                    "originalUnitPrice": "100.00",
                    "taxable": true,
                    "appliedDiscount": {
                        "title": "Summer",
                        "description": "20% off (Summer)",
                        "valueType": "PERCENTAGE",
                        "value": 20.0
                    }
                }]
            })
        );
    }

    #[test]
    fn test_oversized_item_discount_capped_at_price() {
        let mut item = LineItem::new(VariantGid::parse("11"), 1, dec("10.00"));
        item.discounts.push(DiscountSpec::fixed_amount("Loyalty", dec("15")));
        let draft = OrderDraft {
            line_items: vec![item],
            ..OrderDraft::default()
        };

        let json = serde_json::to_value(draft_order_input(&draft)).unwrap();
        assert_eq!(
            json["lineItems"][0]["appliedDiscount"],
            json!({
                "title": "Loyalty",
                "description": "$10.00 (Loyalty)",
                "valueType": "FIXED_AMOUNT",
                "value": 10.0
            })
        );
    }

    #[test]
    fn test_order_level_discount_from_total() {
        let draft = OrderDraft {
            line_items: vec![LineItem::new(VariantGid::parse("1"), 2, dec("25"))],
            total_discount: Some(dec("5")),
            subtotal: Some(dec("50")),
            ..OrderDraft::default()
        };
        let input = draft_order_input(&draft);
        let discount = input.applied_discount.unwrap();
        assert_eq!(discount.title, "Order Discount");
        assert_eq!(discount.value_type, DiscountValueType::Percentage);
        assert_eq!(discount.value, dec("10"));
        assert_eq!(discount.description.as_deref(), Some("Discount: 5.00"));
    }

    #[test]
    fn test_shipping_customer_and_attributes() {
        let draft = OrderDraft {
            line_items: vec![LineItem::new(VariantGid::parse("1"), 1, dec("5"))],
            shipping: Some(ShippingCharge {
                title: "Courier".into(),
                price: dec("4.5"),
            }),
            customer: Some(CustomerRef {
                id: Some(CustomerGid::parse("77")),
                ..CustomerRef::default()
            }),
            tags: vec!["pos".into()],
            ..OrderDraft::default()
        };
        let json = serde_json::to_value(draft_order_input(&draft)).unwrap();
        assert_eq!(json["shippingLine"], json!({"title": "Courier", "price": "4.50"}));
        assert_eq!(
            json["purchasingEntity"],
            json!({"customerId": "gid://shopify/Customer/77"})
        );
        assert_eq!(json["tags"], json!(["pos"]));
        assert!(json.get("customAttributes").is_none());
        assert!(json.get("appliedDiscount").is_none());
    }
}
