//! The caller-supplied order description.

use rust_decimal::Decimal;
use serde::Serialize;

use super::email::Email;
use super::id::{CustomerGid, VariantGid};
use super::money::{CurrencyCode, round_money};

/// Title fragments that mark upstream display metadata rather than a discount.
const METADATA_MARKERS: &[&str] = &["Original Price", "<s>", "</s>", "\u{0336}"];

/// An abstract order, built once per invocation and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderDraft {
    /// Contact email for the order confirmation.
    pub email: Option<Email>,
    /// Existing customer to associate, plus display names.
    pub customer: Option<CustomerRef>,
    /// Ordered line items; identity is position.
    pub line_items: Vec<LineItem>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub note: Option<String>,
    /// Free-text shipping note, stored on the order as a metafield.
    pub shipping_note: Option<String>,
    pub tags: Vec<String>,
    pub note_attributes: Vec<NoteAttribute>,
    pub shipping: Option<ShippingCharge>,
    /// Order-level discounts.
    pub discounts: Vec<DiscountSpec>,
    /// Order-level tax lines.
    pub tax_lines: Vec<TaxLineSpec>,
    /// Total discount reported upstream, used when no explicit discount exists.
    pub total_discount: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    /// Payments to record as transactions once the order exists.
    pub payments: Vec<Payment>,
    /// Leave the order unpaid instead of marking it paid.
    pub payment_pending: bool,
    /// Create the order directly even when the draft flow would do.
    pub create_direct: bool,
    pub currency: CurrencyCode,
}

impl OrderDraft {
    /// Order-level discounts that are real discounts.
    pub fn effective_discounts(&self) -> impl Iterator<Item = &DiscountSpec> {
        self.discounts.iter().filter(|d| !d.is_metadata())
    }

    /// Order-level tax lines that should be transmitted.
    pub fn used_tax_lines(&self) -> impl Iterator<Item = &TaxLineSpec> {
        self.tax_lines.iter().filter(|t| t.used)
    }

    /// Whether any line item carries its own used tax lines.
    #[must_use]
    pub fn has_item_tax_lines(&self) -> bool {
        self.line_items
            .iter()
            .any(|item| item.tax_lines.iter().any(|t| t.used))
    }

    /// Positive total discount, if any.
    #[must_use]
    pub fn positive_total_discount(&self) -> Option<Decimal> {
        self.total_discount.filter(|d| d.is_sign_positive() && !d.is_zero())
    }
}

/// A customer reference carried on the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerRef {
    pub id: Option<CustomerGid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// One ordered catalog variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub variant_id: VariantGid,
    /// Always at least 1.
    pub quantity: u32,
    /// Explicit selling price; wins over `origin_price`.
    pub price: Option<Decimal>,
    /// Pre-discount catalog price.
    pub origin_price: Option<Decimal>,
    pub title: Option<String>,
    pub taxable: bool,
    pub discounts: Vec<DiscountSpec>,
    pub tax_lines: Vec<TaxLineSpec>,
}

impl LineItem {
    /// A taxable line item with a price and no discounts or tax lines.
    #[must_use]
    pub fn new(variant_id: VariantGid, quantity: u32, price: Decimal) -> Self {
        Self {
            variant_id,
            quantity: quantity.max(1),
            price: Some(price),
            origin_price: None,
            title: None,
            taxable: true,
            discounts: Vec::new(),
            tax_lines: Vec::new(),
        }
    }

    /// Resolved pre-discount unit price: override, else origin, else zero.
    /// Never negative.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.price
            .or(self.origin_price)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
    }

    /// Item discounts that are real discounts.
    pub fn effective_discounts(&self) -> impl Iterator<Item = &DiscountSpec> {
        self.discounts.iter().filter(|d| !d.is_metadata())
    }
}

/// Discount kind and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountValue {
    /// Percentage in `0..=100`, two decimals.
    Percentage(Decimal),
    /// Non-negative amount in the order currency, two decimals.
    FixedAmount(Decimal),
}

/// A titled discount at order or item level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountSpec {
    pub title: String,
    pub value: DiscountValue,
}

impl DiscountSpec {
    /// Create a percentage discount, rounded to two decimals and clamped to `0..=100`.
    #[must_use]
    pub fn percentage(title: impl Into<String>, percent: Decimal) -> Self {
        let percent = round_money(percent).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        Self {
            title: title.into(),
            value: DiscountValue::Percentage(percent),
        }
    }

    /// Create a fixed-amount discount, rounded to cents and clamped at zero.
    #[must_use]
    pub fn fixed_amount(title: impl Into<String>, amount: Decimal) -> Self {
        Self {
            title: title.into(),
            value: DiscountValue::FixedAmount(round_money(amount).max(Decimal::ZERO)),
        }
    }

    /// Whether the title marks upstream display metadata (strikethrough
    /// markup or an "Original Price" label) rather than a discount.
    #[must_use]
    pub fn is_metadata(&self) -> bool {
        METADATA_MARKERS.iter().any(|m| self.title.contains(m))
    }
}

/// A named tax charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxLineSpec {
    pub title: String,
    /// Proportion, e.g. `0.0825`.
    pub rate: Option<Decimal>,
    pub amount: Option<Decimal>,
    /// Unused lines are never transmitted.
    pub used: bool,
}

impl TaxLineSpec {
    /// A used tax line.
    #[must_use]
    pub fn new(title: impl Into<String>, rate: Option<Decimal>, amount: Option<Decimal>) -> Self {
        Self {
            title: title.into(),
            rate,
            amount,
            used: true,
        }
    }
}

/// Postal address in the shape shared by draft, GraphQL and REST payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

/// Custom key/value attribute shown on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteAttribute {
    pub name: String,
    pub value: String,
}

/// Shipping charged on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingCharge {
    pub title: String,
    pub price: Decimal,
}

/// A payment taken upstream, recorded as a transaction after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub code: Option<String>,
    pub name: Option<String>,
    pub amount: Decimal,
    pub currency: CurrencyCode,
}
