//! Fixed-point price representation using decimal arithmetic.
//!
//! Prices are kept as [`Decimal`] end to end so that `9.99 x 2` is exactly
//! `19.98`. Rounding happens only when a price is displayed.

use core::fmt;
use core::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places shown to shoppers.
pub const DISPLAY_SCALE: u32 = 2;

/// A non-currency-aware price amount.
///
/// Displays as `$` followed by the amount rounded to two decimals.
///
/// ```rust
/// # use vitrina_core::Price;
/// # use rust_decimal::Decimal;
/// let price = Price::new(Decimal::new(999, 2));
/// assert_eq!(price.to_string(), "$9.99");
/// assert_eq!(price.times(2).to_string(), "$19.98");
/// assert_eq!(Price::ZERO.to_string(), "$0.00");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, DISPLAY_SCALE))
    }

    /// The exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded to the display scale (half away from zero).
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Multiply by a quantity, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Add two prices, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.checked_add(other.0).unwrap_or(Decimal::MAX))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_decimals() {
        assert_eq!(Price::new(Decimal::from(5)).to_string(), "$5.00");
        assert_eq!(Price::new(Decimal::new(15, 1)).to_string(), "$1.50");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::new(Decimal::new(10_005, 3)).to_string(), "$10.01");
        assert_eq!(Price::new(Decimal::new(10_004, 3)).to_string(), "$10.00");
    }

    #[test]
    fn test_times_is_exact() {
        let price = Price::from_cents(333);
        assert_eq!(price.times(3).amount(), Decimal::new(999, 2));
    }

    #[test]
    fn test_times_saturates() {
        assert_eq!(Price::new(Decimal::MAX).times(2).amount(), Decimal::MAX);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(999), Price::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total.to_string(), "$10.00");
    }
}
