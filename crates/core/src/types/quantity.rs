//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of units of a product in a cart line.
///
/// ## Constraints
///
/// - Always an integer in `[1, 99]`
/// - Every constructor clamps; there is no way to build an out-of-range value
///
/// ## Examples
///
/// ```
/// use naked_pineapple_core::Quantity;
///
/// assert_eq!(Quantity::from_f64(150.0).get(), 99);
/// assert_eq!(Quantity::from_f64(0.0).get(), 1);
/// assert_eq!(Quantity::from_f64(f64::NAN).get(), 1);
/// assert_eq!(Quantity::from_f64(2.5).get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "f64")]
pub struct Quantity(u8);

impl Quantity {
    /// Smallest allowed quantity.
    pub const MIN: Self = Self(1);
    /// Largest allowed quantity.
    pub const MAX: Self = Self(99);
    /// A single unit.
    pub const ONE: Self = Self::MIN;

    /// Create a quantity, clamping to `[1, 99]`.
    #[must_use]
    pub fn new(qty: u32) -> Self {
        let clamped = qty.clamp(u32::from(Self::MIN.0), u32::from(Self::MAX.0));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX.0))
    }

    /// Create a quantity from a float: non-finite becomes 1, otherwise the
    /// value is rounded to the nearest integer and clamped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(qty: f64) -> Self {
        if !qty.is_finite() {
            return Self::MIN;
        }
        let rounded = qty.round().clamp(f64::from(Self::MIN.0), f64::from(Self::MAX.0));
        Self(rounded as u8)
    }

    /// Coerce a loosely-typed JSON value. Missing, zero or unparseable
    /// input becomes 1.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(Self::MIN, Self::from_f64),
            Value::String(s) => s.trim().parse::<f64>().map_or(Self::MIN, Self::from_f64),
            _ => Self::MIN,
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Add two quantities, clamping at [`Quantity::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self::new(u32::from(self.0) + u32::from(other.0))
    }

    /// One more unit, clamping at [`Quantity::MAX`].
    #[must_use]
    pub fn increment(self) -> Self {
        self.saturating_add(Self::ONE)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Quantity {
    fn from(qty: f64) -> Self {
        Self::from_f64(qty)
    }
}

impl From<Quantity> for u8 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        Self::from(qty.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_clamps() {
        assert_eq!(Quantity::new(0).get(), 1);
        assert_eq!(Quantity::new(42).get(), 42);
        assert_eq!(Quantity::new(1000).get(), 99);
    }

    #[test]
    fn test_from_f64_rounds_then_clamps() {
        assert_eq!(Quantity::from_f64(150.0).get(), 99);
        assert_eq!(Quantity::from_f64(0.0).get(), 1);
        assert_eq!(Quantity::from_f64(-3.0).get(), 1);
        assert_eq!(Quantity::from_f64(0.4).get(), 1);
        assert_eq!(Quantity::from_f64(3.49).get(), 3);
        assert_eq!(Quantity::from_f64(98.6).get(), 99);
    }

    #[test]
    fn test_from_f64_non_finite() {
        assert_eq!(Quantity::from_f64(f64::NAN).get(), 1);
        assert_eq!(Quantity::from_f64(f64::INFINITY).get(), 1);
        assert_eq!(Quantity::from_f64(f64::NEG_INFINITY).get(), 1);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(Quantity::from_value(&json!(5)).get(), 5);
        assert_eq!(Quantity::from_value(&json!("7")).get(), 7);
        assert_eq!(Quantity::from_value(&json!("lots")).get(), 1);
        assert_eq!(Quantity::from_value(&json!(null)).get(), 1);
        assert_eq!(Quantity::from_value(&json!(250)).get(), 99);
    }

    #[test]
    fn test_saturating_add() {
        assert_eq!(Quantity::new(3).saturating_add(Quantity::new(4)).get(), 7);
        assert_eq!(Quantity::new(60).saturating_add(Quantity::new(60)), Quantity::MAX);
        assert_eq!(Quantity::MAX.increment(), Quantity::MAX);
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Quantity::new(4)).unwrap(), "4");
        let qty: Quantity = serde_json::from_str("120").unwrap();
        assert_eq!(qty, Quantity::MAX);
        let qty: Quantity = serde_json::from_str("2.6").unwrap();
        assert_eq!(qty.get(), 3);
    }
}
