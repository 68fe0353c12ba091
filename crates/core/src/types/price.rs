//! Type-safe price and discount representation using decimal arithmetic.
//!
//! The catalog API sends amounts as JSON numbers, so both types serialize as
//! numbers (not strings) while computing with [`Decimal`] internally. This
//! keeps cart totals exact no matter how many lines are summed.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// Errors that can occur when constructing a [`Discount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// The percentage is outside `0..=100`.
    #[error("discount must be between 0 and 100 percent (got {0})")]
    OutOfRange(Decimal),
}

/// A non-negative price in the store currency.
///
/// ## Examples
///
/// ```
/// use bazaar_core::{Discount, Price};
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::from(200)).unwrap();
/// let discount = Discount::new(Decimal::from(25)).unwrap();
///
/// assert_eq!(price.discounted(discount), Price::new(Decimal::from(150)).unwrap());
/// assert_eq!(price.times(3).amount(), Decimal::from(600));
/// assert!(Price::new(Decimal::from(-1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The largest representable price. Arithmetic saturates here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// This price multiplied by a quantity, saturating at [`Price::MAX`].
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(qty))
            .map_or(Self::MAX, Self)
    }

    /// Sum of two prices, saturating at [`Price::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        self.0.checked_add(other.0).map_or(Self::MAX, Self)
    }

    /// The price after applying a percentage discount.
    #[must_use]
    pub fn discounted(self, discount: Discount) -> Self {
        // The fraction is at most 1, so the cut never exceeds the price.
        let fraction = discount.percent() / Decimal::ONE_HUNDRED;
        let cut = self.0.checked_mul(fraction).unwrap_or(Decimal::ZERO);
        Self(self.0 - cut)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// A percentage discount in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Discount(Decimal);

impl Discount {
    /// No discount.
    pub const NONE: Self = Self(Decimal::ZERO);

    /// Create a new discount percentage.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::OutOfRange`] if `percent` is outside `0..=100`.
    pub fn new(percent: Decimal) -> Result<Self, DiscountError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(DiscountError::OutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// The percentage value.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// A discount with `percent` forced into `0..=100`.
    #[must_use]
    pub fn clamped(percent: Decimal) -> Self {
        Self(percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// Whether any discount applies.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% OFF", self.0.normalize())
    }
}

impl Serialize for Discount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Discount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let percent = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(percent).map_err(serde::de::Error::custom)
    }
}
