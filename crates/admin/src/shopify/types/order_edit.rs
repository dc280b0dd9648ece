//! Order editing domain types.

use orderline_core::payload::MoneyInput;
use orderline_core::{CurrencyCode, DiscountSpec, DiscountValue, VariantGid, format_money};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// An order edit session.
///
/// Tracks the proposed changes until `orderEditCommit` applies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatedOrder {
    /// Calculated order ID (used for all edit operations).
    pub id: String,
    /// Line items in the session, in order.
    pub line_items: Vec<CalculatedLineItem>,
}

/// A line item inside an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatedLineItem {
    /// Calculated line item ID.
    pub id: String,
    /// Current quantity.
    pub quantity: i64,
    /// Variant the line refers to, if any.
    pub variant_id: Option<VariantGid>,
}

/// Input for applying a discount to a line item in an edit session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEditAppliedDiscountInput {
    /// Description of the discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fixed amount per unit (mutually exclusive with `percent_value`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_value: Option<MoneyInput>,
    /// Percentage (0.0 to 100.0, mutually exclusive with `fixed_value`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_value: Option<f64>,
}

impl OrderEditAppliedDiscountInput {
    /// Create a percentage discount.
    #[must_use]
    pub const fn percentage(percent: f64, description: Option<String>) -> Self {
        Self {
            description,
            fixed_value: None,
            percent_value: Some(percent),
        }
    }

    /// Create a fixed amount discount.
    #[must_use]
    pub fn fixed_amount(amount: Decimal, currency: CurrencyCode, description: Option<String>) -> Self {
        Self {
            description,
            fixed_value: Some(MoneyInput {
                amount: format_money(amount),
                currency_code: currency.code().to_string(),
            }),
            percent_value: None,
        }
    }

    /// Convert a resolved line discount. The description defaults to the title.
    #[must_use]
    pub fn from_spec(spec: &DiscountSpec, currency: CurrencyCode, description: Option<String>) -> Self {
        let description = description.or_else(|| {
            (!spec.title.is_empty()).then(|| spec.title.clone())
        });
        match spec.value {
            DiscountValue::Percentage(p) => {
                Self::percentage(p.to_f64().unwrap_or_default(), description)
            }
            DiscountValue::FixedAmount(a) => Self::fixed_amount(a, currency, description),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_percentage_from_spec() {
        let spec = DiscountSpec::percentage("Summer", "20".parse().unwrap());
        let input = OrderEditAppliedDiscountInput::from_spec(&spec, CurrencyCode::USD, None);
        assert_eq!(
            serde_json::to_value(input).unwrap(),
            json!({"description": "Summer", "percentValue": 20.0})
        );
    }

    #[test]
    fn test_fixed_from_spec_keeps_description() {
        let spec = DiscountSpec::fixed_amount("Loyalty", "5".parse().unwrap());
        let input = OrderEditAppliedDiscountInput::from_spec(
            &spec,
            CurrencyCode::GBP,
            Some("£5.00 (Loyalty)".to_string()),
        );
        assert_eq!(
            serde_json::to_value(input).unwrap(),
            json!({
                "description": "£5.00 (Loyalty)",
                "fixedValue": {"amount": "5.00", "currencyCode": "GBP"}
            })
        );
    }
}
