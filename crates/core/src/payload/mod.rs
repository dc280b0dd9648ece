//! Request bodies for the three Shopify order-creation surfaces.
//!
//! - [`draft`] - GraphQL `draftOrderCreate` input
//! - [`graphql`] - GraphQL `orderCreate` input
//! - [`rest`] - REST `orders.json` bodies, including tax-line patches
//!
//! Field names follow each surface's casing: camelCase for GraphQL,
//! snake_case for REST. Amounts are two-decimal strings.

pub mod draft;
pub mod graphql;
pub mod rest;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Address, CurrencyCode, NoteAttribute, OrderDraft, TaxLineSpec, format_money};

pub use draft::{DraftOrderInput, draft_order_input};
pub use graphql::{OrderCreateMode, OrderCreateOrderInput, order_create_input};
pub use rest::{RestOrderRequest, RestOrderTaxUpdate, line_item_tax_update, order_tax_update, rest_order};

/// `MoneyInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyInput {
    pub amount: String,
    pub currency_code: String,
}

/// `MoneyBagInput`: an amount in shop currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyBagInput {
    pub shop_money: MoneyInput,
}

impl MoneyBagInput {
    #[must_use]
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self {
            shop_money: MoneyInput {
                amount: format_money(amount),
                currency_code: currency.code().to_owned(),
            },
        }
    }
}

/// `MailingAddressInput` (GraphQL casing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&Address> for MailingAddressInput {
    fn from(a: &Address) -> Self {
        Self {
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            company: a.company.clone(),
            address1: a.address1.clone(),
            address2: a.address2.clone(),
            city: a.city.clone(),
            province: a.province.clone(),
            country: a.country.clone(),
            zip: a.zip.clone(),
            phone: a.phone.clone(),
        }
    }
}

/// `AttributeInput`: custom key/value shown on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeInput {
    pub key: String,
    pub value: String,
}

impl From<&NoteAttribute> for AttributeInput {
    fn from(a: &NoteAttribute) -> Self {
        Self {
            key: a.name.clone(),
            value: a.value.clone(),
        }
    }
}

/// The tax lines a payload should carry at order level and per item.
///
/// Shopify rejects tax lines at both levels at once, so item-level lines win
/// when any item has them.
pub(crate) fn order_level_tax_lines(draft: &OrderDraft) -> Vec<&TaxLineSpec> {
    if draft.has_item_tax_lines() {
        Vec::new()
    } else {
        draft.used_tax_lines().collect()
    }
}

/// Tax amount to transmit: the stated amount, else `rate × base`.
pub(crate) fn resolved_tax_amount(tax_line: &TaxLineSpec, base: Decimal) -> Option<Decimal> {
    tax_line
        .amount
        .or_else(|| tax_line.rate.map(|rate| rate.saturating_mul(base)))
        .map(crate::types::round_money)
}

/// Render a tax rate as the decimal string Shopify's `Decimal` scalar expects.
pub(crate) fn rate_string(rate: Option<Decimal>) -> String {
    rate.unwrap_or(Decimal::ZERO).normalize().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{LineItem, VariantGid};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_money_bag_serializes_camel_case() {
        let json = serde_json::to_value(MoneyBagInput::new(dec("8.5"), CurrencyCode::USD)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"shopMoney": {"amount": "8.50", "currencyCode": "USD"}})
        );
    }

    #[test]
    fn test_address_skips_missing_fields() {
        let address = Address {
            first_name: Some("Ada".into()),
            city: Some("London".into()),
            ..Address::default()
        };
        let json = serde_json::to_value(MailingAddressInput::from(&address)).unwrap();
        assert_eq!(json, serde_json::json!({"firstName": "Ada", "city": "London"}));
    }

    #[test]
    fn test_item_tax_lines_win() {
        let mut item = LineItem::new(VariantGid::parse("1"), 1, dec("10"));
        item.tax_lines.push(TaxLineSpec::new("Item", None, Some(dec("1"))));
        let draft = OrderDraft {
            line_items: vec![item],
            tax_lines: vec![TaxLineSpec::new("Order", None, Some(dec("1")))],
            ..OrderDraft::default()
        };
        assert!(order_level_tax_lines(&draft).is_empty());
    }

    #[test]
    fn test_resolved_tax_amount() {
        let stated = TaxLineSpec::new("VAT", Some(dec("0.2")), Some(dec("3.333")));
        assert_eq!(resolved_tax_amount(&stated, dec("100")), Some(dec("3.33")));

        let rate_only = TaxLineSpec::new("VAT", Some(dec("0.085")), None);
        assert_eq!(resolved_tax_amount(&rate_only, dec("100")), Some(dec("8.50")));

        let neither = TaxLineSpec::new("VAT", None, None);
        assert_eq!(resolved_tax_amount(&neither, dec("100")), None);
    }

    #[test]
    fn test_rate_string() {
        assert_eq!(rate_string(Some(dec("0.0850"))), "0.085");
        assert_eq!(rate_string(None), "0");
    }
}
