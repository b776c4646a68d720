//! Non-negative unit prices using decimal arithmetic.
//!
//! Prices are persisted as plain JSON numbers so that stored carts stay
//! readable by older storefront builds, but all arithmetic happens on
//! [`Decimal`] to keep cart totals exact.
//!
//! A price carries at most [`Price::SIGNIFICANT_DIGITS`] significant digits,
//! the most a JSON (`f64`) number is guaranteed to hold exactly. Anything
//! finer is rounded away on construction, so a price reads back from storage
//! exactly as it was written.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::Quantity;

/// A price in the store's currency.
///
/// Never negative: constructors clamp negative or unparseable input to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Significant digits kept by every price.
    pub const SIGNIFICANT_DIGITS: u32 = 15;

    /// Create a price, clamping negative amounts to zero and rounding to
    /// [`Price::SIGNIFICANT_DIGITS`].
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() || amount.is_zero() {
            return Self::ZERO;
        }
        Self(
            amount
                .round_sf(Self::SIGNIFICANT_DIGITS)
                .unwrap_or(amount)
                .normalize(),
        )
    }

    /// Create a price from a float via its shortest decimal form, so `0.1`
    /// becomes exactly `0.1`. NaN, infinities and out-of-range values become
    /// zero.
    #[must_use]
    pub fn from_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::ZERO;
        }
        Self::parse_lossy(&amount.to_string())
    }

    /// Parse a price from text, accepting plain and scientific notation.
    ///
    /// Anything unparseable becomes zero.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        let s = s.trim();
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_or(Self::ZERO, Self::new)
    }

    /// Coerce a loosely-typed JSON value into a price.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(Self::ZERO, Self::from_f64),
            Value::String(s) => Self::parse_lossy(s),
            _ => Self::ZERO,
        }
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `qty` units. Saturates instead of overflowing.
    #[must_use]
    pub fn times(self, qty: Quantity) -> Self {
        Self(self.0.saturating_mul(Decimal::from(qty.get())))
    }

    /// Amount rounded to cents, for display only.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0.round_dp(2)
    }

    /// Format for display (e.g., "35.00 USD").
    #[must_use]
    pub fn display(&self, currency: CurrencyCode) -> String {
        format!("{:.2} {}", self.rounded(), currency.code())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Go through the decimal text: `str::parse` rounds to the nearest f64.
        serializer.serialize_f64(self.0.to_string().parse().unwrap_or(0.0))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Number(f64),
            Text(String),
        }

        Ok(match RawPrice::deserialize(deserializer)? {
            RawPrice::Number(n) => Self::from_f64(n),
            RawPrice::Text(s) => Self::parse_lossy(&s),
        })
    }
}

/// ISO 4217 currency codes used for display.
///
/// Carts hold a single currency; no conversion happens anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    SEK,
}

impl CurrencyCode {
    /// The three-letter code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::SEK => "SEK",
        }
    }
}

/// Error returned when a currency code is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "SEK" => Ok(Self::SEK),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}
