//! Type-safe price representation using decimal arithmetic.
//!
//! All prices in the app are euro amounts. Binary floats would turn
//! `10 * 2 + 5 + 8.99` into `33.989999...`, so amounts are carried as
//! [`Decimal`] and only rounded for display.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative euro amount.
///
/// Serialized as a decimal string (`"8.99"`) so that no precision is lost in
/// persisted carts. Deserialization re-checks the non-negative constraint.
///
/// ## Examples
///
/// ```
/// use pizzeria_core::Price;
///
/// let margherita = Price::from_cents(1000);
/// let cola = Price::from_cents(500);
///
/// let total = margherita.times(2) + cola;
/// assert_eq!(total.to_string(), "€ 25.00");
///
/// assert!(Price::from_cents(-1).is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// ISO 4217 code of the currency every price is expressed in.
    pub const CURRENCY_CODE: &'static str = "EUR";

    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
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

    /// Create a price from a whole number of cents.
    ///
    /// Negative inputs saturate to zero.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents.max(0), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The price of `quantity` units, saturating at the largest
    /// representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Saturates at the largest representable amount.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("€ {:.2}", self.0))
    }
}

impl std::str::FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceParseError::Malformed)?;
        Ok(Self::new(amount)?)
    }
}

/// Errors that can occur when parsing a [`Price`] from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    /// The text is not a decimal number.
    #[error("price must be a decimal number")]
    Malformed,
    /// The number is not a valid price.
    #[error(transparent)]
    Invalid(#[from] PriceError),
}
