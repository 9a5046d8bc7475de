//! Money arithmetic for orders and receipts
//!
//! All amounts are [`Decimal`] in Ethiopian birr with two fractional digits.
//! Rounding is half away from zero, applied once per computed figure.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round an amount to cents.
pub fn round_money(amount: Decimal) -> Decimal {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// `quantity × unit_price`, rounded to cents.
pub fn line_subtotal(quantity: u32, unit_price: Decimal) -> Decimal {
    round_money(Decimal::from(quantity) * unit_price)
}

/// Whether two amounts agree within `tolerance`.
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

/// Breakdown of an order's amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals from `(quantity, unit_price)` lines.
    ///
    /// VAT is charged on the goods subtotal only; the delivery fee is added
    /// after tax.
    pub fn compute<I>(lines: I, vat_rate: Decimal, delivery_fee: Decimal) -> Self
    where
        I: IntoIterator<Item = (u32, Decimal)>,
    {
        let subtotal = lines
            .into_iter()
            .map(|(quantity, unit_price)| line_subtotal(quantity, unit_price))
            .sum::<Decimal>();
        let subtotal = round_money(subtotal);
        let vat_amount = round_money(subtotal * vat_rate);
        let delivery_fee = round_money(delivery_fee);

        Self {
            subtotal,
            vat_amount,
            delivery_fee,
            total: round_money(subtotal + vat_amount + delivery_fee),
        }
    }
}
