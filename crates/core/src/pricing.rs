//! Subtotal, total, and discount arithmetic.
//!
//! All money values are [`Decimal`] with two decimal places; rounding is
//! half-up at the cent. Totals are summed from already-rounded line
//! subtotals, then the discount (if any) is applied to the total and the
//! result rounded once more.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::PaymentMethod;

/// Number of decimal places for money values.
const MONEY_SCALE: u32 = 2;

/// Round a money value to two decimal places, half-up.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Subtotal for one cart line: `unit_price × qty`, rounded to the cent.
#[must_use]
pub fn line_subtotal(unit_price: Decimal, qty: u32) -> Decimal {
    round_money(unit_price * Decimal::from(qty))
}

/// Apply the configured percentage discount to a price.
///
/// A percent of zero returns the price unchanged; otherwise the price is
/// multiplied by `(100 − percent)/100` and rounded to the cent.
#[must_use]
pub fn price_with_discount(price: Decimal, percent: u8) -> Decimal {
    if percent == 0 {
        return price;
    }
    let factor = (Decimal::from(100u32) - Decimal::from(percent)) / Decimal::from(100u32);
    round_money(price * factor)
}

/// The amount actually charged for a cart total under the given payment
/// method: discounted for the eligible method, unchanged otherwise.
#[must_use]
pub fn effective_amount(total: Decimal, method: PaymentMethod, percent: u8) -> Decimal {
    if method.discount_eligible() {
        price_with_discount(total, percent)
    } else {
        total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn discount_never_increases_price() {
        let price = dec("37.90");
        for percent in 0..=100u8 {
            let discounted = price_with_discount(price, percent);
            assert!(discounted <= price, "percent {percent} raised the price");
            if percent == 0 {
                assert_eq!(discounted, price);
            } else {
                assert!(discounted < price, "percent {percent} left price unchanged");
            }
        }
    }

    #[test]
    fn full_discount_reaches_zero() {
        assert_eq!(price_with_discount(dec("99.99"), 100), dec("0.00"));
    }

    #[test]
    fn rounds_half_up_at_the_cent() {
        // 0.05 * 50% = 0.025, which rounds up to 0.03
        assert_eq!(price_with_discount(dec("0.05"), 50), dec("0.03"));
    }

    #[test]
    fn line_subtotal_multiplies_and_rounds() {
        assert_eq!(line_subtotal(dec("120.00"), 2), dec("240.00"));
        assert_eq!(line_subtotal(dec("33.33"), 3), dec("99.99"));
    }

    #[test]
    fn effective_amount_discounts_pix_only() {
        let total = dec("240.00");
        assert_eq!(
            effective_amount(total, PaymentMethod::Pix, 10),
            dec("216.00")
        );
        assert_eq!(effective_amount(total, PaymentMethod::Card, 10), total);
    }

    #[test]
    fn zero_percent_is_identity_for_both_methods() {
        let total = dec("57.30");
        assert_eq!(effective_amount(total, PaymentMethod::Pix, 0), total);
        assert_eq!(effective_amount(total, PaymentMethod::Card, 0), total);
    }
}
