//! Order payload builder.
//!
//! Shopify has no single order-creation call that accepts custom tax lines,
//! line-item discounts and order-level discounts together. [`classify`] picks
//! the creation path for a draft; the submodules do the price arithmetic the
//! chosen path needs.

mod discount;
mod line_item;
mod tax;

use core::fmt;

use serde::Serialize;

pub use discount::{build_order_level_discount, order_discount_description};
pub use line_item::{AppliedDiscount, PricedLineItem, build_line_item, strikethrough};
pub use tax::{LineItemTaxPortion, distribute_tax};

use crate::types::OrderDraft;

/// How an order is created on the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// GraphQL `orderCreate` with plain prices, no tax lines.
    DirectNoFrills,
    /// REST `POST /orders.json` carrying custom tax lines.
    DirectWithTaxOnly,
    /// GraphQL `orderCreate` with discounted prices, annotations and tax lines.
    DirectWithTaxAndDiscount,
    /// `draftOrderCreate` then `draftOrderComplete`.
    DraftOrderFlow,
}

impl Strategy {
    /// Short label for summaries and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DirectNoFrills => "direct order (GraphQL)",
            Self::DirectWithTaxOnly => "direct order with tax (REST)",
            Self::DirectWithTaxAndDiscount => "direct order with tax and discounts (GraphQL)",
            Self::DraftOrderFlow => "draft order",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether any used tax line exists at order or item level.
#[must_use]
pub fn has_tax(draft: &OrderDraft) -> bool {
    draft.used_tax_lines().next().is_some() || draft.has_item_tax_lines()
}

/// Whether any real discount exists at order or item level.
#[must_use]
pub fn has_discount(draft: &OrderDraft) -> bool {
    draft.effective_discounts().next().is_some()
        || draft.positive_total_discount().is_some()
        || draft
            .line_items
            .iter()
            .any(|item| item.effective_discounts().next().is_some())
}

/// Pick the creation path for a draft.
///
/// Draft orders cannot carry custom tax, so any tax forces direct creation:
/// REST when there is nothing to discount, GraphQL otherwise. Without tax the
/// draft flow is used unless the draft asks for direct creation.
#[must_use]
pub fn classify(draft: &OrderDraft) -> Strategy {
    match (has_tax(draft), has_discount(draft)) {
        (true, true) => Strategy::DirectWithTaxAndDiscount,
        (true, false) => Strategy::DirectWithTaxOnly,
        (false, _) if draft.create_direct => Strategy::DirectNoFrills,
        (false, _) => Strategy::DraftOrderFlow,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{DiscountSpec, LineItem, TaxLineSpec, VariantGid};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn draft(tax: bool, discount: bool, direct: bool) -> OrderDraft {
        let mut item = LineItem::new(VariantGid::parse("1"), 1, dec("100.00"));
        if discount {
            item.discounts
                .push(DiscountSpec::percentage("Sale", dec("20")));
        }
        OrderDraft {
            line_items: vec![item],
            tax_lines: if tax {
                vec![TaxLineSpec::new("VAT", Some(dec("0.085")), Some(dec("8.50")))]
            } else {
                Vec::new()
            },
            create_direct: direct,
            ..OrderDraft::default()
        }
    }

    #[test]
    fn test_classify_is_total() {
        for direct in [false, true] {
            assert_eq!(
                classify(&draft(true, true, direct)),
                Strategy::DirectWithTaxAndDiscount
            );
            assert_eq!(
                classify(&draft(true, false, direct)),
                Strategy::DirectWithTaxOnly
            );
        }
        assert_eq!(classify(&draft(false, false, false)), Strategy::DraftOrderFlow);
        assert_eq!(classify(&draft(false, true, false)), Strategy::DraftOrderFlow);
        assert_eq!(classify(&draft(false, false, true)), Strategy::DirectNoFrills);
        assert_eq!(classify(&draft(false, true, true)), Strategy::DirectNoFrills);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let d = draft(true, true, false);
        assert_eq!(classify(&d), classify(&d));
    }

    #[test]
    fn test_unused_tax_does_not_count() {
        let mut d = draft(false, false, false);
        let mut unused = TaxLineSpec::new("Old", None, Some(dec("1")));
        unused.used = false;
        d.tax_lines.push(unused);
        assert_eq!(classify(&d), Strategy::DraftOrderFlow);
    }

    #[test]
    fn test_item_tax_counts() {
        let mut d = draft(false, false, false);
        d.line_items[0]
            .tax_lines
            .push(TaxLineSpec::new("GST", Some(dec("0.1")), Some(dec("10"))));
        assert_eq!(classify(&d), Strategy::DirectWithTaxOnly);
    }

    #[test]
    fn test_metadata_discount_is_not_a_discount() {
        let mut d = draft(true, false, false);
        d.line_items[0]
            .discounts
            .push(DiscountSpec::fixed_amount("Original Price <s>100</s>", dec("20")));
        assert_eq!(classify(&d), Strategy::DirectWithTaxOnly);
    }

    #[test]
    fn test_total_discount_counts() {
        let mut d = draft(true, false, false);
        d.total_discount = Some(dec("5"));
        assert_eq!(classify(&d), Strategy::DirectWithTaxAndDiscount);

        d.total_discount = Some(Decimal::ZERO);
        assert_eq!(classify(&d), Strategy::DirectWithTaxOnly);
    }
}
