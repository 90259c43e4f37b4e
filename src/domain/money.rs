//! Monetary types for price representation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

/// A fractional-dollar ask price, always in `(0, 1]`.
///
/// Every venue adapter normalizes its wire format into this type at the
/// boundary (see `crate::venue`), so the evaluator never has to reason
/// about integer cents, ladders, or per-venue rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// Construct a price, clamping to the valid `(0, 1]` range.
    ///
    /// Venue feeds occasionally report exactly `0` for an illiquid side;
    /// clamping to a single cent rather than rejecting keeps the predicate
    /// math well-defined instead of forcing every caller to handle `None`.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let floor = dec!(0.01);
        let ceiling = dec!(1.00);
        Self(value.clamp(floor, ceiling))
    }

    /// Construct a price from integer cents (e.g. a Kalshi ladder level).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl std::ops::Add for Price {
    type Output = Decimal;
    fn add(self, rhs: Self) -> Decimal {
        self.0 + rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_above_one() {
        assert_eq!(Price::new(dec!(1.5)).as_decimal(), dec!(1.00));
    }

    #[test]
    fn clamps_zero_to_one_cent() {
        assert_eq!(Price::new(dec!(0)).as_decimal(), dec!(0.01));
    }

    #[test]
    fn from_cents_converts() {
        assert_eq!(Price::from_cents(48).as_decimal(), dec!(0.48));
    }

    #[test]
    fn sums_two_prices() {
        let total = Price::new(dec!(0.48)) + Price::new(dec!(0.54));
        assert_eq!(total, dec!(1.02));
    }
}
