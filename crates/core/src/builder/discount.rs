use rust_decimal::Decimal;

use crate::types::{DiscountSpec, OrderDraft, format_money};

const DERIVED_TITLE: &str = "Order Discount";

/// The single order-level discount to send.
///
/// Takes the first explicit order-level discount. Without one, a positive
/// total discount becomes a percentage of the subtotal (two decimals), or a
/// fixed amount when no usable subtotal is known or the ratio overflows.
#[must_use]
pub fn build_order_level_discount(draft: &OrderDraft) -> Option<DiscountSpec> {
    if let Some(first) = draft.effective_discounts().next() {
        return Some(first.clone());
    }

    let total = draft.positive_total_discount()?;
    let percent = draft
        .subtotal
        .filter(|s| *s > Decimal::ZERO)
        .and_then(|subtotal| total.checked_div(subtotal))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    let discount = match percent {
        Some(percent) => DiscountSpec::percentage(DERIVED_TITLE, percent),
        None => DiscountSpec::fixed_amount(DERIVED_TITLE, total),
    };
    Some(discount)
}

/// Description shown with a derived order discount, e.g. `"Discount: 12.50"`.
#[must_use]
pub fn order_discount_description(draft: &OrderDraft) -> Option<String> {
    draft
        .positive_total_discount()
        .map(|total| format!("Discount: {}", format_money(total)))
}
