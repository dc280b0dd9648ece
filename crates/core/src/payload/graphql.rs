//! `orderCreate` input.
//!
//! The mutation cannot take a price override and a separate line discount at
//! the same time. Discounted mode sends the already-discounted unit price and
//! records the original price and discount breakdown as line properties.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    AttributeInput, MailingAddressInput, MoneyBagInput, order_level_tax_lines, rate_string,
    resolved_tax_amount,
};
use crate::builder::{PricedLineItem, build_line_item, build_order_level_discount};
use crate::types::{
    CurrencyCode, DiscountValue, OrderDraft, TaxLineSpec, extended_amount, saturating_sum,
};

/// Line property holding the struck-through original price.
pub const ORIGINAL_PRICE_PROPERTY: &str = "Original Price";
/// Line property holding the discount breakdown.
pub const DISCOUNT_PROPERTY: &str = "Line item discount";

/// Which prices the created order carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCreateMode {
    /// Discounted unit prices with annotation properties and the order-level
    /// discount code.
    Discounted,
    /// Original unit prices only; discounts are applied later in an edit
    /// session.
    Undiscounted,
}

/// `OrderCreateOrderInput`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateOrderInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub line_items: Vec<OrderCreateLineItemInput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_lines: Vec<OrderCreateTaxLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<OrderCreateDiscountCodeInput>,
    pub financial_status: OrderCreateFinancialStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shipping_lines: Vec<OrderCreateShippingLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<MailingAddressInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<MailingAddressInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_attributes: Vec<AttributeInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<OrderCreateCustomerInput>,
    pub currency: String,
}

/// `OrderCreateLineItemInput`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateLineItemInput {
    pub variant_id: String,
    pub quantity: u32,
    pub price_set: MoneyBagInput,
    pub taxable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<LineItemPropertyInput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_lines: Vec<OrderCreateTaxLineInput>,
}

/// `OrderCreateLineItemPropertyInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemPropertyInput {
    pub name: String,
    pub value: String,
}

/// `OrderCreateTaxLineInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateTaxLineInput {
    pub title: String,
    pub rate: String,
    pub price_set: MoneyBagInput,
}

impl OrderCreateTaxLineInput {
    fn from_spec(spec: &TaxLineSpec, base: Decimal, currency: CurrencyCode) -> Option<Self> {
        let amount = resolved_tax_amount(spec, base)?;
        Some(Self {
            title: spec.title.clone(),
            rate: rate_string(spec.rate),
            price_set: MoneyBagInput::new(amount, currency),
        })
    }
}

/// `OrderCreateDiscountCodeInput`: exactly one of the fields is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateDiscountCodeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_percentage_discount_code: Option<PercentageDiscountCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_fixed_discount_code: Option<FixedDiscountCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentageDiscountCode {
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDiscountCode {
    pub code: String,
    pub amount_set: MoneyBagInput,
}

/// `OrderCreateFinancialStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCreateFinancialStatus {
    Paid,
    Pending,
}

/// `OrderCreateShippingLineInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateShippingLineInput {
    pub title: String,
    pub price_set: MoneyBagInput,
}

/// `OrderCreateCustomerInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateCustomerInput {
    pub to_associate: CustomerAssociation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerAssociation {
    pub id: String,
}

/// Shape a draft for `orderCreate`.
#[must_use]
pub fn order_create_input(draft: &OrderDraft, mode: OrderCreateMode) -> OrderCreateOrderInput {
    let currency = draft.currency;
    let priced: Vec<PricedLineItem> = draft.line_items.iter().map(build_line_item).collect();

    let line_items = draft
        .line_items
        .iter()
        .zip(&priced)
        .map(|(item, p)| {
            let unit_price = match mode {
                OrderCreateMode::Discounted => p.discounted_price,
                OrderCreateMode::Undiscounted => p.original_price,
            };
            let extended = extended_amount(unit_price, p.quantity);
            OrderCreateLineItemInput {
                variant_id: p.variant_id.to_string(),
                quantity: p.quantity,
                price_set: MoneyBagInput::new(unit_price, currency),
                taxable: p.taxable,
                properties: match mode {
                    OrderCreateMode::Discounted => annotation_properties(p),
                    OrderCreateMode::Undiscounted => Vec::new(),
                },
                tax_lines: item
                    .tax_lines
                    .iter()
                    .filter(|t| t.used)
                    .filter_map(|t| OrderCreateTaxLineInput::from_spec(t, extended, currency))
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
    let tax_lines = order_level_tax_lines(draft)
        .into_iter()
        .filter_map(|t| OrderCreateTaxLineInput::from_spec(t, taxable_base, currency))
        .collect();

    let discount_code = match mode {
        OrderCreateMode::Discounted => {
            build_order_level_discount(draft).map(|spec| match spec.value {
                DiscountValue::Percentage(percentage) => OrderCreateDiscountCodeInput {
                    item_percentage_discount_code: Some(PercentageDiscountCode {
                        code: spec.title,
                        percentage,
                    }),
                    item_fixed_discount_code: None,
                },
                DiscountValue::FixedAmount(amount) => OrderCreateDiscountCodeInput {
                    item_percentage_discount_code: None,
                    item_fixed_discount_code: Some(FixedDiscountCode {
                        code: spec.title,
                        amount_set: MoneyBagInput::new(amount, currency),
                    }),
                },
            })
        }
        OrderCreateMode::Undiscounted => None,
    };

    OrderCreateOrderInput {
        email: draft.email.as_ref().map(ToString::to_string),
        line_items,
        tax_lines,
        discount_code,
        financial_status: if draft.payment_pending {
            OrderCreateFinancialStatus::Pending
        } else {
            OrderCreateFinancialStatus::Paid
        },
        shipping_lines: draft
            .shipping
            .iter()
            .map(|s| OrderCreateShippingLineInput {
                title: s.title.clone(),
                price_set: MoneyBagInput::new(s.price, currency),
            })
            .collect(),
        shipping_address: draft.shipping_address.as_ref().map(Into::into),
        billing_address: draft.billing_address.as_ref().map(Into::into),
        note: draft.note.clone(),
        tags: draft.tags.clone(),
        custom_attributes: draft.note_attributes.iter().map(Into::into).collect(),
        customer: draft
            .customer
            .as_ref()
            .and_then(|c| c.id.as_ref())
            .map(|id| OrderCreateCustomerInput {
                to_associate: CustomerAssociation { id: id.to_string() },
            }),
        currency: currency.code().to_owned(),
    }
}

fn annotation_properties(priced: &PricedLineItem) -> Vec<LineItemPropertyInput> {
    let mut properties = Vec::new();
    if let Some(original) = &priced.strikethrough_original {
        properties.push(LineItemPropertyInput {
            name: ORIGINAL_PRICE_PROPERTY.to_owned(),
            value: original.clone(),
        });
    }
    if let Some(summary) = &priced.discount_summary {
        properties.push(LineItemPropertyInput {
            name: DISCOUNT_PROPERTY.to_owned(),
            value: summary.clone(),
        });
    }
    properties
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::builder::strikethrough;
    use crate::types::{DiscountSpec, LineItem, VariantGid};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn taxed_discounted_draft() -> OrderDraft {
        let mut item = LineItem::new(VariantGid::parse("5"), 2, dec("50.00"));
        item.discounts.push(DiscountSpec::fixed_amount("Loyalty", dec("5")));
        OrderDraft {
            line_items: vec![item],
            tax_lines: vec![TaxLineSpec::new("VAT", Some(dec("0.1")), Some(dec("9.00")))],
            discounts: vec![DiscountSpec::percentage("WELCOME10", dec("10"))],
            ..OrderDraft::default()
        }
    }

    #[test]
    fn test_discounted_mode() {
        let input = order_create_input(&taxed_discounted_draft(), OrderCreateMode::Discounted);
        let json = serde_json::to_value(&input).unwrap();

        let line = &json["lineItems"][0];
        assert_eq!(line["priceSet"]["shopMoney"]["amount"], "45.00");
        assert_eq!(line["quantity"], 2);
        assert_eq!(
            line["properties"],
            json!([
                {"name": "Original Price", "value": strikethrough("$50.00")},
                {"name": "Line item discount", "value": "$5.00 (Loyalty)"}
            ])
        );
        assert!(line.get("taxLines").is_none());

        assert_eq!(
            json["taxLines"],
            json!([{
                "title": "VAT",
                "rate": "0.1",
                "priceSet": {"shopMoney": {"amount": "9.00", "currencyCode": "USD"}}
            }])
        );
        assert_eq!(
            json["discountCode"],
            json!({"itemPercentageDiscountCode": {"code": "WELCOME10", "percentage": 10.0}})
        );
        assert_eq!(json["financialStatus"], "PAID");
        assert_eq!(json["currency"], "USD");
    }

    #[test]
    fn test_undiscounted_mode() {
        let input = order_create_input(&taxed_discounted_draft(), OrderCreateMode::Undiscounted);
        let line = &input.line_items[0];
        assert_eq!(line.price_set.shop_money.amount, "50.00");
        assert!(line.properties.is_empty());
        assert!(input.discount_code.is_none());
        assert_eq!(input.tax_lines.len(), 1);
    }

    #[test]
    fn test_fixed_order_discount_and_pending() {
        let mut draft = taxed_discounted_draft();
        draft.discounts.clear();
        draft.total_discount = Some(dec("3"));
        draft.payment_pending = true;
        let json = serde_json::to_value(order_create_input(&draft, OrderCreateMode::Discounted)).unwrap();
        assert_eq!(
            json["discountCode"],
            json!({"itemFixedDiscountCode": {
                "code": "Order Discount",
                "amountSet": {"shopMoney": {"amount": "3.00", "currencyCode": "USD"}}
            }})
        );
        assert_eq!(json["financialStatus"], "PENDING");
    }

    #[test]
    fn test_rate_only_tax_uses_taxable_base() {
        let mut draft = taxed_discounted_draft();
        draft.tax_lines = vec![TaxLineSpec::new("GST", Some(dec("0.1")), None)];
        let input = order_create_input(&draft, OrderCreateMode::Discounted);
        assert_eq!(input.tax_lines[0].price_set.shop_money.amount, "9.00");
    }

    #[test]
    fn test_item_tax_lines_sent_per_line() {
        let mut draft = taxed_discounted_draft();
        draft.line_items[0]
            .tax_lines
            .push(TaxLineSpec::new("City", Some(dec("0.02")), None));
        let input = order_create_input(&draft, OrderCreateMode::Discounted);
        assert!(input.tax_lines.is_empty());
        assert_eq!(input.line_items[0].tax_lines[0].price_set.shop_money.amount, "1.80");
    }
}
