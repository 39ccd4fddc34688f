//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// A unit price in the catalog's (single) display currency.
///
/// Wraps [`Decimal`] so that prices are never accidentally mixed with other
/// numeric values. Serialized as a plain JSON number, which is the wire format
/// the catalog API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price, used as the fallback when no catalog price is known.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The extended price for `quantity` units.
    #[must_use]
    pub fn extend(&self, quantity: Quantity) -> Decimal {
        self.0 * Decimal::from(quantity.get())
    }

    /// Round to two decimal places for display.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0.round_dp(2)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display_rounds_to_cents() {
        let price = Price::new("9.999".parse().unwrap());
        assert_eq!(price.to_string(), "$10.00");
    }

    #[test]
    fn test_price_extend() {
        let price = Price::new("9.99".parse().unwrap());
        let total = price.extend(Quantity::clamped(2));
        assert_eq!(total, "19.98".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_price_serde_as_number() {
        let price: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(price, Price::new("9.99".parse().unwrap()));
    }

    #[test]
    fn test_zero_fallback() {
        assert_eq!(Price::ZERO.extend(Quantity::clamped(10)), Decimal::ZERO);
    }
}
