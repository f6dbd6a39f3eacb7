//! Decimal price type.
//!
//! Catalog and payment APIs exchange prices as JSON numbers, so [`Price`]
//! serializes as a float while all arithmetic stays in [`Decimal`] to keep
//! cart totals free of binary rounding drift.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A price in the store currency's standard unit (e.g. dollars, not cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
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

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_times_quantity() {
        let price = Price::from_cents(1099);
        assert_eq!(price.times(3), Price::from_cents(3297));
        assert_eq!(price.times(0), Price::ZERO);
    }

    #[test]
    fn test_price_sum_has_no_float_drift() {
        let total: Price = [Price::from_cents(10), Price::from_cents(20)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(30));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(5000).to_string(), "$50.00");
        assert_eq!(Price::from_cents(1995).to_string(), "$19.95");
    }

    #[test]
    fn test_price_reads_json_numbers() {
        let price: Price = serde_json::from_str("109.95").unwrap();
        assert_eq!(price, Price::from_cents(10995));
        let price: Price = serde_json::from_str("10").unwrap();
        assert_eq!(price, Price::from_cents(1000));
    }

    #[test]
    fn test_price_writes_json_numbers() {
        let json = serde_json::to_string(&Price::from_cents(1995)).unwrap();
        assert_eq!(json, "19.95");
    }
}
