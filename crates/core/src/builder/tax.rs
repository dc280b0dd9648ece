use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::types::{OrderDraft, extended_amount, round_money, saturating_sum};

const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The share of one order-level tax line carried by one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemTaxPortion {
    /// Position of the line item in the draft.
    pub line_index: usize,
    pub title: String,
    pub rate: Option<Decimal>,
    pub amount: Decimal,
}

/// Spread each used order-level tax line over the line items.
///
/// Portions are proportional to each item's pre-tax extended price
/// (`unit price × quantity`). Each share is rounded down to the cent and the
/// leftover cents go one at a time to the items with the largest remainders
/// (earlier items first on ties), so the portions of a tax line add up to its
/// amount and none is negative. A draft whose extended prices sum to zero
/// yields no portions; tax lines without a positive amount are skipped.
#[must_use]
pub fn distribute_tax(draft: &OrderDraft) -> Vec<LineItemTaxPortion> {
    let weights: Vec<(usize, Decimal)> = draft
        .line_items
        .iter()
        .enumerate()
        .map(|(index, item)| (index, extended_amount(item.unit_price(), item.quantity)))
        .filter(|(_, weight)| *weight > Decimal::ZERO)
        .collect();

    let total = saturating_sum(weights.iter().map(|(_, w)| *w));
    if total.is_zero() {
        return Vec::new();
    }

    let mut portions = Vec::new();
    for tax_line in draft.used_tax_lines() {
        let Some(amount) = tax_line
            .amount
            .map(round_money)
            .filter(|a| *a > Decimal::ZERO)
        else {
            continue;
        };

        let shares = split(amount, &weights, total);
        for ((index, _), share) in weights.iter().zip(shares) {
            portions.push(LineItemTaxPortion {
                line_index: *index,
                title: tax_line.title.clone(),
                rate: tax_line.rate,
                amount: share,
            });
        }
    }
    portions
}

/// Largest-remainder split of `amount` in cents, one share per weight.
fn split(amount: Decimal, weights: &[(usize, Decimal)], total: Decimal) -> Vec<Decimal> {
    let exact: Vec<Decimal> = weights
        .iter()
        .map(|(_, weight)| amount * (*weight / total).min(Decimal::ONE))
        .collect();
    let mut shares: Vec<Decimal> = exact.iter().map(|e| floor_cents(*e)).collect();

    let allocated = saturating_sum(shares.iter().copied());
    let leftover_cents = ((amount - allocated) / CENT)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(shares.len());

    let mut by_remainder: Vec<(usize, Decimal)> = exact
        .iter()
        .zip(&shares)
        .map(|(exact, floored)| *exact - *floored)
        .enumerate()
        .collect();
    by_remainder.sort_by(|(a, ra), (b, rb)| rb.cmp(ra).then(a.cmp(b)));
    for (position, _) in by_remainder.into_iter().take(leftover_cents) {
        if let Some(share) = shares.get_mut(position) {
            *share += CENT;
        }
    }
    shares
}

fn floor_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}
