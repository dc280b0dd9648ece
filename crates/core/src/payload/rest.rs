//! REST `orders.json` bodies.
//!
//! REST is the only surface that accepts custom tax lines on a direct order
//! without also requiring a discount object, and the only one that can put
//! custom tax lines back after an order edit.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{order_level_tax_lines, resolved_tax_amount};
use crate::builder::{build_line_item, distribute_tax};
use crate::types::{
    Address, OrderDraft, TaxLineSpec, extended_amount, format_money, saturating_sum,
};

/// `{"order": {...}}` for `POST /orders.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestOrderRequest {
    pub order: RestOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub line_items: Vec<RestLineItem>,
    pub financial_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<RestAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<RestAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_lines: Vec<RestTaxLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shipping_lines: Vec<RestShippingLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub note_attributes: Vec<RestNoteAttribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<RestCustomer>,
    pub currency: &'static str,
    pub taxes_included: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<u64>,
    pub quantity: u32,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub taxable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_lines: Vec<RestTaxLine>,
}

/// A tax line in REST casing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestTaxLine {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    pub price: String,
}

impl RestTaxLine {
    fn from_spec(spec: &TaxLineSpec, base: Decimal) -> Option<Self> {
        Some(Self {
            title: spec.title.clone(),
            rate: spec.rate.unwrap_or(Decimal::ZERO),
            price: format_money(resolved_tax_amount(spec, base)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestShippingLine {
    pub title: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestNoteAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestCustomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Address in REST casing; field names already match the domain type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RestAddress(pub Address);

/// `{"order": {...}}` for `PUT /orders/{id}.json` restoring tax lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestOrderTaxUpdate {
    pub order: RestTaxPatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestTaxPatch {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_lines: Option<Vec<RestTaxLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<RestLineItemTaxPatch>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestLineItemTaxPatch {
    pub id: u64,
    pub tax_lines: Vec<RestTaxLine>,
}

/// Shape a draft for `POST /orders.json`.
#[must_use]
pub fn rest_order(draft: &OrderDraft) -> RestOrderRequest {
    let priced: Vec<_> = draft.line_items.iter().map(build_line_item).collect();

    let line_items = draft
        .line_items
        .iter()
        .zip(&priced)
        .map(|(item, p)| {
            let extended = extended_amount(p.discounted_price, p.quantity);
            RestLineItem {
                variant_id: item.variant_id.numeric(),
                quantity: p.quantity,
                price: format_money(p.discounted_price),
                title: item.title.clone(),
                taxable: item.taxable,
                tax_lines: item
                    .tax_lines
                    .iter()
                    .filter(|t| t.used)
                    .filter_map(|t| RestTaxLine::from_spec(t, extended))
                    .collect(),
            }
        })
        .collect();

    let taxable_base = saturating_sum(
        priced
            .iter()
            .filter(|p| p.taxable)
            .map(|p| extended_amount(p.discounted_price, p.quantity)),
    );

    let customer = draft.customer.as_ref().map(|c| RestCustomer {
        id: c.id.as_ref().and_then(|id| id.numeric()),
        first_name: c.first_name.clone(),
        last_name: c.last_name.clone(),
        email: draft.email.as_ref().map(ToString::to_string),
    });

    RestOrderRequest {
        order: RestOrder {
            email: draft.email.as_ref().map(ToString::to_string),
            line_items,
            financial_status: if draft.payment_pending { "pending" } else { "paid" },
            note: draft.note.clone(),
            tags: draft.tags.join(","),
            shipping_address: draft.shipping_address.clone().map(RestAddress),
            billing_address: draft.billing_address.clone().map(RestAddress),
            tax_lines: order_level_tax_lines(draft)
                .into_iter()
                .filter_map(|t| RestTaxLine::from_spec(t, taxable_base))
                .collect(),
            shipping_lines: draft
                .shipping
                .iter()
                .map(|s| RestShippingLine {
                    title: s.title.clone(),
                    price: format_money(s.price),
                })
                .collect(),
            note_attributes: draft
                .note_attributes
                .iter()
                .map(|a| RestNoteAttribute {
                    name: a.name.clone(),
                    value: a.value.clone(),
                })
                .collect(),
            customer,
            currency: draft.currency.code(),
            taxes_included: false,
        },
    }
}

/// Order-level tax restoration body.
#[must_use]
pub fn order_tax_update(order_id: u64, draft: &OrderDraft) -> RestOrderTaxUpdate {
    let base = saturating_sum(
        draft
            .line_items
            .iter()
            .map(|item| extended_amount(item.unit_price(), item.quantity)),
    );
    RestOrderTaxUpdate {
        order: RestTaxPatch {
            id: order_id,
            tax_lines: Some(
                draft
                    .used_tax_lines()
                    .filter_map(|t| RestTaxLine::from_spec(t, base))
                    .collect(),
            ),
            line_items: None,
        },
    }
}

/// Line-item-level tax restoration body.
///
/// Each order-level tax line is split with [`distribute_tax`] and attached to
/// the remote line item at the same position. Positions without a remote id
/// are dropped.
#[must_use]
pub fn line_item_tax_update(
    order_id: u64,
    draft: &OrderDraft,
    remote_line_item_ids: &[u64],
) -> RestOrderTaxUpdate {
    let mut per_line: Vec<Vec<RestTaxLine>> = vec![Vec::new(); draft.line_items.len()];
    for portion in distribute_tax(draft) {
        if let Some(lines) = per_line.get_mut(portion.line_index) {
            lines.push(RestTaxLine {
                title: portion.title,
                rate: portion.rate.unwrap_or(Decimal::ZERO),
                price: format_money(portion.amount),
            });
        }
    }

    let line_items = per_line
        .into_iter()
        .zip(remote_line_item_ids)
        .filter(|(lines, _)| !lines.is_empty())
        .map(|(tax_lines, id)| RestLineItemTaxPatch { id: *id, tax_lines })
        .collect();

    RestOrderTaxUpdate {
        order: RestTaxPatch {
            id: order_id,
            tax_lines: None,
            line_items: Some(line_items),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{CustomerGid, CustomerRef, Email, LineItem, VariantGid};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn vat_draft() -> OrderDraft {
        let mut item = LineItem::new(VariantGid::parse("gid://shopify/ProductVariant/321"), 1, dec("100.00"));
        item.title = Some("Linen Tee".into());
        OrderDraft {
            email: Some(Email::parse("ada@example.com").unwrap()),
            line_items: vec![item],
            tax_lines: vec![TaxLineSpec::new("VAT", Some(dec("0.085")), Some(dec("8.50")))],
            subtotal: Some(dec("100.00")),
            tags: vec!["pos".into(), "vip".into()],
            ..OrderDraft::default()
        }
    }

    #[test]
    fn test_rest_order_shape() {
        let json = serde_json::to_value(rest_order(&vat_draft())).unwrap();
        assert_eq!(
            json,
            json!({
                "order": {
                    "email": "ada@example.com",
                    "line_items": [{
                        "variant_id": 321,
                        "quantity": 1,
                        "price": "100.00",
                        "title": "Linen Tee",
                        "taxable": true
                    }],
                    "financial_status": "paid",
                    "tags": "pos,vip",
                    "tax_lines": [{"title": "VAT", "rate": 0.085, "price": "8.50"}],
                    "currency": "USD",
                    "taxes_included": false
                }
            })
        );
    }

    #[test]
    fn test_customer_and_address() {
        let mut draft = vat_draft();
        draft.customer = Some(CustomerRef {
            id: Some(CustomerGid::parse("9")),
            first_name: Some("Ada".into()),
            last_name: None,
        });
        draft.shipping_address = Some(Address {
            first_name: Some("Ada".into()),
            zip: Some("N1".into()),
            ..Address::default()
        });
        let json = serde_json::to_value(rest_order(&draft)).unwrap();
        assert_eq!(
            json["order"]["customer"],
            json!({"id": 9, "first_name": "Ada", "email": "ada@example.com"})
        );
        assert_eq!(json["order"]["shipping_address"]["first_name"], "Ada");
        assert_eq!(json["order"]["shipping_address"]["zip"], "N1");
    }

    #[test]
    fn test_order_tax_update() {
        let json = serde_json::to_value(order_tax_update(42, &vat_draft())).unwrap();
        assert_eq!(
            json,
            json!({"order": {"id": 42, "tax_lines": [{"title": "VAT", "rate": 0.085, "price": "8.50"}]}})
        );
    }

    #[test]
    fn test_line_item_tax_update_distributes() {
        let mut draft = vat_draft();
        draft
            .line_items
            .push(LineItem::new(VariantGid::parse("322"), 3, dec("0")));
        draft
            .line_items
            .push(LineItem::new(VariantGid::parse("323"), 1, dec("100.00")));
        let update = line_item_tax_update(42, &draft, &[1001, 1002, 1003]);
        let lines = update.order.line_items.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, 1001);
        assert_eq!(lines[0].tax_lines[0].price, "4.25");
        assert_eq!(lines[1].id, 1003);
        assert_eq!(lines[1].tax_lines[0].price, "4.25");
        assert!(update.order.tax_lines.is_none());
    }
}
