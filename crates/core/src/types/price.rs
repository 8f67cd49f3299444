//! Euro price representation using decimal arithmetic.
//!
//! Prices arrive from the backend as plain JSON numbers (`10`, `12.5`) or
//! numeric strings. They are kept as [`Decimal`] so that totals never pick up
//! binary floating point noise, and displayed the way the shop always has:
//! the amount without trailing zeros, followed by ` €`.
//!
//! Arithmetic is checked. The amounts come straight from the backend, so an
//! absurd price or quantity yields `None` instead of a panic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero euros.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Add two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Multiply by a quantity, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} €", self.0.normalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_drops_trailing_zeros() {
        assert_eq!(Price::from_cents(2000).to_string(), "20 €");
        assert_eq!(Price::from_cents(1050).to_string(), "10.5 €");
        assert_eq!(Price::from_cents(1999).to_string(), "19.99 €");
        assert_eq!(Price::ZERO.to_string(), "0 €");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_int: Price = serde_json::from_str("10").unwrap();
        let from_float: Price = serde_json::from_str("12.5").unwrap();
        let from_str: Price = serde_json::from_str("\"12.50\"").unwrap();

        assert_eq!(from_int, Price::from_cents(1000));
        assert_eq!(from_float, Price::from_cents(1250));
        assert_eq!(from_str, Price::from_cents(1250));
    }

    #[test]
    fn test_multiply_by_quantity() {
        assert_eq!(
            Price::from_cents(1000).checked_mul(2),
            Some(Price::from_cents(2000))
        );
        assert_eq!(Price::from_cents(1000).checked_mul(0), Some(Price::ZERO));
    }

    #[test]
    fn test_overflow_is_none() {
        let max: Price = serde_json::from_str("\"79228162514264337593543950335\"").unwrap();

        assert_eq!(max.checked_mul(2), None);
        assert_eq!(max.checked_add(max), None);
        assert_eq!(max.checked_mul(1), Some(max));
    }
}
