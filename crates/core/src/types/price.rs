//! Type-safe price representation using decimal arithmetic.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A negative amount offered as a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("price must not be negative, got {0}")]
pub struct NegativePrice(pub Decimal);

/// A non-negative price in the store currency.
///
/// Accepts JSON numbers or decimal strings on the wire; negative amounts are
/// rejected. Always displays with a dollar sign and exactly two decimal places,
/// e.g. `$19.99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = NegativePrice;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            Err(NegativePrice(amount))
        } else {
            Ok(Self(amount))
        }
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.amount()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "${rounded:.2}")
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(1000).times(2), Price::from_cents(550)]
            .into_iter()
            .sum();
        assert_eq!(total.to_string(), "$25.50");
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("10").unwrap();
        let from_float: Price = serde_json::from_str("12.5").unwrap();
        let from_string: Price = serde_json::from_str("\"7.25\"").unwrap();
        assert_eq!(from_number.to_string(), "$10.00");
        assert_eq!(from_float.to_string(), "$12.50");
        assert_eq!(from_string.to_string(), "$7.25");
    }

    #[test]
    fn test_display_rounds_extra_precision() {
        let price = Price::try_from(Decimal::new(12_345, 3)).unwrap();
        assert_eq!(price.to_string(), "$12.35");
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        assert_eq!(
            Price::try_from(Decimal::new(-1, 2)),
            Err(NegativePrice(Decimal::new(-1, 2)))
        );
        assert!(serde_json::from_str::<Price>("-3.5").is_err());
        assert_eq!(Price::try_from(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_serializes_amount_as_decimal_string() {
        let price = Price::from_cents(1999);
        assert_eq!(price.amount(), Decimal::new(1999, 2));
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"19.99\"");
    }
}
