//! Money type for representing monetary values.
//!
//! Uses a cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. The store trades in
//! a single currency, so `Money` carries no currency dimension.
//!
//! On the wire, amounts are JSON numbers in major units with two decimal
//! places (`4999` cents serializes as `49.99`), matching the API contract.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Create a Money value from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money value from a decimal amount in major units.
    ///
    /// ```
    /// use till_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.cents(), 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    /// Amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Amount in major units.
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Add, returning `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(self, factor: i64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Sum an iterator of Money values, returning `None` on overflow.
    pub fn try_sum(iter: impl Iterator<Item = Money>) -> Option<Money> {
        let mut total = Money::ZERO;
        for m in iter {
            total = total.checked_add(m)?;
        }
        Some(total)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() {
            return Err(de::Error::custom("monetary amount must be finite"));
        }
        Ok(Money::from_decimal(amount))
    }
}
