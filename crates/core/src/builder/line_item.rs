use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{
    DiscountSpec, DiscountValue, LineItem, VariantGid, format_money, format_percent, percent_of,
    round_money,
};

const STRIKETHROUGH: char = '\u{0336}';

/// One discount as it was applied to the running unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDiscount {
    pub spec: DiscountSpec,
    /// Actual per-unit reduction after clamping.
    pub amount_per_unit: Decimal,
    /// The requested reduction exceeded the remaining price.
    pub clamped: bool,
    /// `"20% off (Summer)"` or `"$5.00 (Loyalty)"`.
    pub description: String,
}

/// A line item with its discounts resolved into a final unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLineItem {
    pub variant_id: VariantGid,
    pub quantity: u32,
    pub title: Option<String>,
    pub taxable: bool,
    pub original_price: Decimal,
    pub discounted_price: Decimal,
    pub applied: Vec<AppliedDiscount>,
    /// Original price with every character struck through, set when discounted.
    pub strikethrough_original: Option<String>,
    /// Discount descriptions joined by newlines, set when discounted.
    pub discount_summary: Option<String>,
}

impl AppliedDiscount {
    /// The discount as it can be sent: the original one, or a fixed amount
    /// equal to the reduction actually taken when it was clamped.
    #[must_use]
    pub fn effective_spec(&self) -> DiscountSpec {
        if self.clamped {
            DiscountSpec::fixed_amount(self.spec.title.clone(), self.amount_per_unit)
        } else {
            self.spec.clone()
        }
    }
}

impl PricedLineItem {
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Total per-unit reduction across all applied discounts.
    #[must_use]
    pub fn discount_per_unit(&self) -> Decimal {
        self.original_price - self.discounted_price
    }

    /// The discounts folded into one, for surfaces that accept a single
    /// discount per line. A lone discount is kept as applied; several collapse
    /// into a per-unit fixed amount equal to the total reduction.
    #[must_use]
    pub fn combined_discount(&self) -> Option<DiscountSpec> {
        match self.applied.as_slice() {
            [] => None,
            [only] => Some(only.effective_spec()),
            many => {
                let title = many
                    .iter()
                    .map(|a| a.spec.title.as_str())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(DiscountSpec::fixed_amount(title, self.discount_per_unit()))
            }
        }
    }
}

/// Resolve a line item's unit price and apply its discounts in order.
///
/// Each discount is computed against the price left by the previous ones and
/// the price never drops below zero. Metadata entries are skipped.
#[must_use]
pub fn build_line_item(item: &LineItem) -> PricedLineItem {
    let original_price = item.unit_price();
    let mut price = original_price;
    let mut applied = Vec::new();

    for spec in item.effective_discounts() {
        let requested = match spec.value {
            DiscountValue::Percentage(percent) => round_money(percent_of(price, percent)),
            DiscountValue::FixedAmount(amount) => amount,
        };
        let reduction = requested.clamp(Decimal::ZERO, price);
        price -= reduction;
        let mut discount = AppliedDiscount {
            spec: spec.clone(),
            amount_per_unit: reduction,
            clamped: reduction < requested,
            description: String::new(),
        };
        discount.description = describe(&discount.effective_spec());
        applied.push(discount);
    }

    let (strikethrough_original, discount_summary) = if applied.is_empty() {
        (None, None)
    } else {
        let summary = applied
            .iter()
            .map(|a| a.description.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        (
            Some(strikethrough(&format!("${}", format_money(original_price)))),
            Some(summary),
        )
    };

    PricedLineItem {
        variant_id: item.variant_id.clone(),
        quantity: item.quantity,
        title: item.title.clone(),
        taxable: item.taxable,
        original_price,
        discounted_price: price,
        applied,
        strikethrough_original,
        discount_summary,
    }
}

fn describe(spec: &DiscountSpec) -> String {
    let base = match spec.value {
        DiscountValue::Percentage(percent) => format!("{}% off", format_percent(percent)),
        DiscountValue::FixedAmount(amount) => format!("${}", format_money(amount)),
    };
    if spec.title.is_empty() {
        base
    } else {
        format!("{base} ({})", spec.title)
    }
}

/// Follow every character with U+0336 so it renders struck through.
#[must_use]
pub fn strikethrough(text: &str) -> String {
    text.chars().flat_map(|c| [c, STRIKETHROUGH]).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(price: &str, discounts: Vec<DiscountSpec>) -> LineItem {
        let mut item = LineItem::new(VariantGid::parse("1"), 2, dec(price));
        item.discounts = discounts;
        item
    }

    #[test]
    fn test_single_percentage() {
        let priced = build_line_item(&item(
            "100.00",
            vec![DiscountSpec::percentage("", dec("20"))],
        ));
        assert_eq!(format_money(priced.discounted_price), "80.00");
        assert_eq!(priced.discount_summary.as_deref(), Some("20% off"));
        assert_eq!(
            priced.strikethrough_original.as_deref(),
            Some("$\u{336}1\u{336}0\u{336}0\u{336}.\u{336}0\u{336}0\u{336}")
        );
    }

    #[test]
    fn test_discounts_apply_sequentially() {
        let priced = build_line_item(&item(
            "100.00",
            vec![
                DiscountSpec::percentage("Sale", dec("10")),
                DiscountSpec::percentage("Member", dec("10")),
                DiscountSpec::fixed_amount("Coupon", dec("1")),
            ],
        ));
        // 100 -> 90 -> 81 -> 80
        assert_eq!(priced.discounted_price, dec("80.00"));
        assert_eq!(priced.applied[1].amount_per_unit, dec("9.00"));
        assert_eq!(
            priced.discount_summary.as_deref(),
            Some("10% off (Sale)\n10% off (Member)\n$1.00 (Coupon)")
        );
    }

    #[test]
    fn test_price_clamped_at_zero() {
        let priced = build_line_item(&item(
            "10.00",
            vec![
                DiscountSpec::fixed_amount("Big", dec("8")),
                DiscountSpec::fixed_amount("Bigger", dec("8")),
                DiscountSpec::percentage("Extra", dec("50")),
            ],
        ));
        assert_eq!(priced.discounted_price, Decimal::ZERO);
        assert_eq!(priced.applied[1].amount_per_unit, dec("2.00"));
        assert_eq!(priced.applied[2].amount_per_unit, Decimal::ZERO);
        assert!(priced.applied.iter().all(|a| a.amount_per_unit >= Decimal::ZERO));
    }

    #[test]
    fn test_oversized_discount_sent_as_applied_amount() {
        let priced = build_line_item(&item(
            "10.00",
            vec![DiscountSpec::fixed_amount("Big", dec("15"))],
        ));
        assert_eq!(priced.discounted_price, Decimal::ZERO);
        assert!(priced.applied[0].clamped);
        assert_eq!(
            priced.combined_discount(),
            Some(DiscountSpec::fixed_amount("Big", dec("10.00")))
        );
        assert_eq!(priced.discount_summary.as_deref(), Some("$10.00 (Big)"));

        let exact = build_line_item(&item(
            "10.00",
            vec![DiscountSpec::fixed_amount("Exact", dec("10"))],
        ));
        assert!(!exact.applied[0].clamped);
        assert_eq!(exact.discount_summary.as_deref(), Some("$10.00 (Exact)"));
    }

    #[test]
    fn test_huge_price_does_not_overflow() {
        let priced = build_line_item(&item(
            "79228162514264337593543950335",
            vec![DiscountSpec::percentage("Sale", dec("20"))],
        ));
        assert!(priced.discounted_price > Decimal::ZERO);
        assert!(priced.discounted_price < priced.original_price);
    }

    #[test]
    fn test_rederived_discount_matches_request() {
        for (price, percent) in [("100.00", "20"), ("59.99", "15"), ("12.50", "33.33")] {
            let priced = build_line_item(&item(
                price,
                vec![DiscountSpec::percentage("p", dec(percent))],
            ));
            let derived =
                priced.discount_per_unit() / priced.original_price * Decimal::ONE_HUNDRED;
            assert!((derived - dec(percent)).abs() < dec("0.1"), "{price} {percent}");
        }

        let priced = build_line_item(&item(
            "40.00",
            vec![DiscountSpec::fixed_amount("f", dec("7.25"))],
        ));
        assert_eq!(priced.discount_per_unit(), dec("7.25"));
    }

    #[test]
    fn test_metadata_discount_skipped() {
        let priced = build_line_item(&item(
            "100.00",
            vec![DiscountSpec::fixed_amount("Original Price <s>100</s>", dec("100"))],
        ));
        assert_eq!(priced.discounted_price, dec("100.00"));
        assert!(!priced.is_discounted());
        assert!(priced.discount_summary.is_none());
        assert!(priced.strikethrough_original.is_none());
    }

    #[test]
    fn test_origin_price_fallback() {
        let mut li = item("1", Vec::new());
        li.price = None;
        li.origin_price = Some(dec("24.00"));
        assert_eq!(build_line_item(&li).original_price, dec("24.00"));
    }

    #[test]
    fn test_combined_discount() {
        let single = build_line_item(&item(
            "50.00",
            vec![DiscountSpec::percentage("Sale", dec("10"))],
        ));
        assert_eq!(
            single.combined_discount(),
            Some(DiscountSpec::percentage("Sale", dec("10")))
        );

        let many = build_line_item(&item(
            "50.00",
            vec![
                DiscountSpec::percentage("Sale", dec("10")),
                DiscountSpec::fixed_amount("Coupon", dec("5")),
            ],
        ));
        assert_eq!(
            many.combined_discount(),
            Some(DiscountSpec::fixed_amount("Sale, Coupon", dec("10.00")))
        );
    }
}
