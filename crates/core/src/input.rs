//! The local `input.json` order format.
//!
//! The file holds a single top-level `order` object with camelCase fields.
//! Numbers may arrive as JSON numbers or strings; anything that does not parse
//! as a number is treated as absent rather than rejecting the whole order.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{
    Address, CurrencyCode, CustomerGid, CustomerRef, DiscountSpec, DiscountValue, Email, LineItem,
    NoteAttribute, OrderDraft, Payment, ShippingCharge, TaxLineSpec, VariantGid, parse_decimal,
};

const DEFAULT_SHIPPING_TITLE: &str = "Shipping";
const ITEM_DISCOUNT_TITLE: &str = "Item Discount";
/// Largest amount accepted anywhere in the file (10^12).
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);
/// Largest quantity accepted on one line.
const MAX_QUANTITY: u32 = 1_000_000;

/// Errors that make an input file unusable.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    /// The file is not valid JSON or lacks the `order` object.
    #[error("invalid order input: {0}")]
    Json(#[from] serde_json::Error),

    /// No item carried a variant identifier.
    #[error("order input has no line items")]
    NoLineItems,

    /// A number is too large to price safely.
    #[error("{field} is out of range: {value}")]
    OutOfRange {
        /// Which value, e.g. `items[2].price`.
        field: String,
        value: String,
    },
}

/// Parse an `input.json` document into an [`OrderDraft`].
///
/// # Errors
///
/// Returns an error if the document is not valid JSON, has no `order` object,
/// contains no usable line items, or carries an amount or quantity too large
/// to price.
pub fn parse_order_input(json: &str) -> Result<OrderDraft, InputError> {
    let file: InputFile = serde_json::from_str(json)?;
    let draft = file.order.into_draft();
    if draft.line_items.is_empty() {
        return Err(InputError::NoLineItems);
    }
    check_ranges(&draft)?;
    Ok(draft)
}

fn check_ranges(draft: &OrderDraft) -> Result<(), InputError> {
    for (i, item) in draft.line_items.iter().enumerate() {
        if item.quantity > MAX_QUANTITY {
            return Err(InputError::OutOfRange {
                field: format!("items[{i}].quantity"),
                value: item.quantity.to_string(),
            });
        }
        check_amount(&format!("items[{i}].price"), item.price)?;
        check_amount(&format!("items[{i}].originPrice"), item.origin_price)?;
        for discount in &item.discounts {
            if let DiscountValue::FixedAmount(amount) = discount.value {
                check_amount(&format!("items[{i}].discount"), Some(amount))?;
            }
        }
        for tax_line in &item.tax_lines {
            check_amount(&format!("items[{i}].taxLines"), tax_line.amount)?;
        }
    }
    for discount in &draft.discounts {
        if let DiscountValue::FixedAmount(amount) = discount.value {
            check_amount("discountApplications", Some(amount))?;
        }
    }
    for tax_line in &draft.tax_lines {
        check_amount("taxLines", tax_line.amount)?;
    }
    check_amount("totalDiscounts", draft.total_discount)?;
    check_amount("subtotalPrice", draft.subtotal)?;
    check_amount("shipping", draft.shipping.as_ref().map(|s| s.price))?;
    for payment in &draft.payments {
        check_amount("payments", Some(payment.amount))?;
    }
    Ok(())
}

fn check_amount(field: &str, amount: Option<Decimal>) -> Result<(), InputError> {
    match amount {
        Some(amount) if amount.abs() > MAX_AMOUNT => Err(InputError::OutOfRange {
            field: field.to_string(),
            value: amount.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Top-level wrapper.
#[derive(Debug, Deserialize)]
pub struct InputFile {
    pub order: OrderInput,
}

/// The `order` object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderInput {
    pub email: Option<String>,
    pub customer: Option<CustomerInput>,
    pub items: Vec<ItemInput>,
    pub shipping_address: Option<AddressInput>,
    pub billing_address: Option<AddressInput>,
    pub note: Option<String>,
    pub shipping_note: Option<String>,
    pub additional_data: Option<AdditionalData>,
    pub note_attributes: Vec<NoteAttributeInput>,
    pub tags: Option<TagsInput>,
    pub discount_applications: Vec<DiscountInput>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total_discounts: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub subtotal_price: Option<Decimal>,
    pub tax_lines: Vec<TaxLineInput>,
    pub shipping_method: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total_shipping: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total_shipping_inc_tax: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total_shipping_ex_tax: Option<Decimal>,
    pub payments: Vec<PaymentInput>,
    pub payment_pending: bool,
    pub create_direct: bool,
    pub currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemInput {
    #[serde(deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub origin_price: Option<Decimal>,
    pub name: Option<String>,
    pub taxable: Option<bool>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total_discount: Option<Decimal>,
    pub discount_applications: Vec<DiscountInput>,
    pub tax_lines: Vec<TaxLineInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscountInput {
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub value: Option<Decimal>,
    pub value_type: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxLineInput {
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub rate: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    pub is_used: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub zip: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
}

/// Free-form extras; only the shipping note is read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdditionalData {
    pub shipping_note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteAttributeInput {
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentInput {
    pub payment_code: Option<String>,
    pub payment_name: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

/// Tags as a comma-separated string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Joined(String),
    List(Vec<String>),
}

impl TagsInput {
    fn into_tags(self) -> Vec<String> {
        let raw = match self {
            Self::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
            Self::List(list) => list,
        };
        raw.into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl OrderInput {
    /// Convert into the domain draft.
    #[must_use]
    pub fn into_draft(self) -> OrderDraft {
        let currency: CurrencyCode = self
            .currency
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or_default();

        let email = self
            .customer
            .as_ref()
            .and_then(|c| non_blank(c.email.as_deref()))
            .or_else(|| non_blank(self.email.as_deref()))
            .and_then(|e| Email::parse(e).ok());

        let customer = self.customer.map(|c| CustomerRef {
            id: non_blank(c.id.as_deref()).map(CustomerGid::parse),
            first_name: c.first_name,
            last_name: c.last_name,
        });

        let shipping_note = self
            .additional_data
            .and_then(|a| a.shipping_note)
            .filter(|n| !n.trim().is_empty())
            .or(self.shipping_note)
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());

        let shipping = [
            self.total_shipping_inc_tax,
            self.total_shipping_ex_tax,
            self.total_shipping,
        ]
        .into_iter()
        .flatten()
        .find(|p| *p > Decimal::ZERO)
        .map(|price| ShippingCharge {
            title: non_blank(self.shipping_method.as_deref())
                .unwrap_or(DEFAULT_SHIPPING_TITLE)
                .to_owned(),
            price,
        });

        OrderDraft {
            email,
            customer,
            line_items: self.items.into_iter().filter_map(ItemInput::into_line_item).collect(),
            shipping_address: self.shipping_address.map(AddressInput::into_address),
            billing_address: self.billing_address.map(AddressInput::into_address),
            note: self.note.filter(|n| !n.trim().is_empty()),
            shipping_note,
            tags: self.tags.map(TagsInput::into_tags).unwrap_or_default(),
            note_attributes: self
                .note_attributes
                .into_iter()
                .filter(|a| !a.name.is_empty())
                .map(|a| NoteAttribute {
                    name: a.name,
                    value: a.value.unwrap_or_default(),
                })
                .collect(),
            shipping,
            discounts: self
                .discount_applications
                .into_iter()
                .filter_map(DiscountInput::into_spec)
                .collect(),
            tax_lines: self
                .tax_lines
                .into_iter()
                .map(TaxLineInput::into_spec)
                .collect(),
            total_discount: self.total_discounts,
            subtotal: self.subtotal_price,
            payments: self
                .payments
                .into_iter()
                .filter_map(|p| p.into_payment(currency))
                .collect(),
            payment_pending: self.payment_pending,
            create_direct: self.create_direct,
            currency,
        }
    }
}

impl ItemInput {
    fn into_line_item(self) -> Option<LineItem> {
        let variant_id = VariantGid::parse(non_blank(self.product_id.as_deref())?);
        let quantity = self
            .quantity
            .and_then(|q| q.trunc().to_u32())
            .unwrap_or(1)
            .max(1);

        let mut discounts: Vec<DiscountSpec> = self
            .discount_applications
            .into_iter()
            .filter_map(DiscountInput::into_spec)
            .collect();
        if discounts.is_empty()
            && let Some(total) = self.total_discount.filter(|d| *d > Decimal::ZERO)
        {
            discounts.push(DiscountSpec::fixed_amount(ITEM_DISCOUNT_TITLE, total));
        }

        Some(LineItem {
            variant_id,
            quantity,
            price: self.price,
            origin_price: self.origin_price,
            title: self.name,
            taxable: self.taxable.unwrap_or(true),
            discounts,
            tax_lines: self.tax_lines.into_iter().map(TaxLineInput::into_spec).collect(),
        })
    }
}

impl DiscountInput {
    fn into_spec(self) -> Option<DiscountSpec> {
        let title = self.title.unwrap_or_default();
        let kind = self.value_type.unwrap_or_default().to_ascii_lowercase();
        if kind == "percentage" {
            let percent = self.value.or(self.amount)?;
            Some(DiscountSpec::percentage(title, percent))
        } else {
            let amount = self.amount.or(self.value)?;
            Some(DiscountSpec::fixed_amount(title, amount))
        }
    }
}

impl TaxLineInput {
    fn into_spec(self) -> TaxLineSpec {
        TaxLineSpec {
            title: non_blank(self.title.as_deref()).unwrap_or("Tax").to_owned(),
            rate: self.rate,
            amount: self.price,
            used: self.is_used.unwrap_or(true),
        }
    }
}

impl AddressInput {
    fn into_address(self) -> Address {
        Address {
            first_name: self.first_name,
            last_name: self.last_name,
            company: self.company,
            address1: self.address1,
            address2: self.address2,
            city: self.city,
            province: self.province,
            country: self.country,
            zip: self.zip,
            phone: self.phone,
        }
    }
}

impl PaymentInput {
    fn into_payment(self, order_currency: CurrencyCode) -> Option<Payment> {
        let amount = self.amount.filter(|a| *a > Decimal::ZERO)?;
        Some(Payment {
            code: self.payment_code,
            name: self.payment_name,
            amount,
            currency: self
                .currency
                .as_deref()
                .and_then(|c| c.parse().ok())
                .unwrap_or(order_currency),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => parse_decimal(&s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::DiscountValue;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    const SAMPLE: &str = r#"{
        "order": {
            "email": "fallback@example.com",
            "customer": {"id": 7001, "firstName": "Ada", "lastName": "Byron", "email": "ada@example.com"},
            "items": [
                {
                    "productId": "44526183104745",
                    "quantity": 2,
                    "price": "100.00",
                    "originPrice": 120,
                    "name": "Linen Tee",
                    "discountApplications": [
                        {"title": "Summer", "value": "20", "valueType": "percentage"},
                        {"title": "Original Price <s>120</s>", "value": "20", "valueType": "fixed_amount", "amount": "20"}
                    ]
                },
                {"productId": "gid://shopify/ProductVariant/9", "quantity": "1", "price": "oops", "originPrice": "15.50", "totalDiscount": "2.5"},
                {"productId": "", "quantity": 1, "price": "1.00"}
            ],
            "shippingAddress": {"firstName": "Ada", "city": "London", "zip": 12345},
            "additionalData": {"shipping_note": "  Leave at door  "},
            "shippingNote": "ignored",
            "noteAttributes": [{"name": "register", "value": 3}],
            "tags": "pos, walk-in ,,",
            "taxLines": [
                {"title": "VAT", "rate": 0.085, "price": "8.50", "isUsed": true},
                {"title": "Old", "rate": "0.1", "price": "1.00", "isUsed": false},
                {"title": "Implicit", "price": "bad"}
            ],
            "totalDiscounts": "12.50",
            "subtotalPrice": "215.50",
            "shippingMethod": "",
            "totalShipping": "5",
            "totalShippingIncTax": "0",
            "payments": [{"paymentCode": "cash", "paymentName": "Cash", "amount": "100", "currency": "usd"}]
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let draft = parse_order_input(SAMPLE).unwrap();

        assert_eq!(draft.email.as_ref().unwrap().as_str(), "ada@example.com");
        assert_eq!(
            draft.customer.as_ref().unwrap().id.as_ref().unwrap().as_str(),
            "gid://shopify/Customer/7001"
        );
        assert_eq!(draft.line_items.len(), 2);

        let first = &draft.line_items[0];
        assert_eq!(first.variant_id.as_str(), "gid://shopify/ProductVariant/44526183104745");
        assert_eq!(first.quantity, 2);
        assert_eq!(first.price, Some(dec("100.00")));
        assert_eq!(first.origin_price, Some(dec("120")));
        assert_eq!(first.discounts.len(), 2);
        assert_eq!(first.effective_discounts().count(), 1);

        let second = &draft.line_items[1];
        assert_eq!(second.price, None);
        assert_eq!(second.unit_price(), dec("15.50"));
        assert_eq!(
            second.discounts[0].value,
            DiscountValue::FixedAmount(dec("2.50"))
        );

        assert_eq!(draft.shipping_note.as_deref(), Some("Leave at door"));
        assert_eq!(draft.tags, ["pos", "walk-in"]);
        assert_eq!(draft.note_attributes[0].value, "3");
        assert_eq!(draft.shipping_address.as_ref().unwrap().zip.as_deref(), Some("12345"));

        assert_eq!(draft.tax_lines.len(), 3);
        assert_eq!(draft.used_tax_lines().count(), 2);
        assert_eq!(draft.tax_lines[2].amount, None);
        assert_eq!(draft.tax_lines[0].rate, Some(dec("0.085")));

        let shipping = draft.shipping.unwrap();
        assert_eq!(shipping.title, "Shipping");
        assert_eq!(shipping.price, dec("5"));

        assert_eq!(draft.total_discount, Some(dec("12.50")));
        assert_eq!(draft.payments.len(), 1);
        assert_eq!(draft.payments[0].currency, CurrencyCode::USD);
    }

    #[test]
    fn test_tags_as_list() {
        let draft = parse_order_input(
            r#"{"order": {"items": [{"productId": "1"}], "tags": ["a", " b "]}}"#,
        )
        .unwrap();
        assert_eq!(draft.tags, ["a", "b"]);
        assert_eq!(draft.line_items[0].quantity, 1);
    }

    #[test]
    fn test_shipping_note_fallback() {
        let draft = parse_order_input(
            r#"{"order": {"items": [{"productId": "1"}], "additionalData": {"shipping_note": " "}, "shippingNote": "Ring bell"}}"#,
        )
        .unwrap();
        assert_eq!(draft.shipping_note.as_deref(), Some("Ring bell"));
    }

    #[test]
    fn test_invalid_email_treated_as_absent() {
        let draft = parse_order_input(
            r#"{"order": {"items": [{"productId": "1"}], "email": "not-an-email"}}"#,
        )
        .unwrap();
        assert!(draft.email.is_none());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let err = parse_order_input(
            r#"{"order": {"items": [{"productId": "1", "price": "79228162514264337593543950335"}]}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "items[0].price is out of range: 79228162514264337593543950335"
        );

        assert!(matches!(
            parse_order_input(
                r#"{"order": {"items": [{"productId": "1", "quantity": 4000000000, "price": "1"}]}}"#,
            ),
            Err(InputError::OutOfRange { field, .. }) if field == "items[0].quantity"
        ));

        assert!(matches!(
            parse_order_input(
                r#"{"order": {"items": [{"productId": "1", "price": "1"}], "totalDiscounts": "1e20"}}"#,
            ),
            Err(InputError::OutOfRange { field, .. }) if field == "totalDiscounts"
        ));
    }

    #[test]
    fn test_no_items_is_error() {
        assert!(matches!(
            parse_order_input(r#"{"order": {"items": []}}"#),
            Err(InputError::NoLineItems)
        ));
        assert!(matches!(
            parse_order_input(r#"{"items": []}"#),
            Err(InputError::Json(_))
        ));
    }
}
