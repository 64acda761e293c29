//! Display formatting for decimal money amounts.
//!
//! Arithmetic stays in unrounded [`Decimal`] values; rounding to cents only
//! happens here, at the display boundary. Every renderer goes through these
//! helpers so the sidebar and the checkout summary can never disagree.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits shown for any amount.
pub const DISPLAY_SCALE: u32 = 2;

/// Format an amount with exactly two decimal places (e.g. `"134.48"`).
///
/// Midpoints round away from zero, so `0.005` displays as `"0.01"`.
///
/// ```
/// use pineapple_cart_core::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(13448, 2)), "134.48");
/// assert_eq!(format_amount(Decimal::ZERO), "0.00");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}

/// Format an amount as a dollar price (e.g. `"$49.99"`).
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${}", format_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_pads_to_two_places() {
        assert_eq!(format_amount(Decimal::new(345, 1)), "34.50");
        assert_eq!(format_amount(Decimal::from(12)), "12.00");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(5, 3)), "0.01");
        assert_eq!(format_amount(Decimal::new(12_349, 4)), "1.23");
        assert_eq!(format_amount(Decimal::new(1235, 3)), "1.24");
    }

    #[test]
    fn test_format_amount_zero() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(4999, 2)), "$49.99");
    }
}
