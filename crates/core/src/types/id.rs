//! Product identifier used as the cart line key.

use core::borrow::Borrow;
use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a product in the catalogue.
///
/// A cart holds at most one line per `ProductId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Coerce a loosely-typed JSON value into an ID.
    ///
    /// Strings are taken as-is, numbers and booleans use their textual form.
    /// Returns `None` for empty strings and anything else.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Bool(b) => Some(Self(b.to_string())),
            _ => None,
        }
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_coerces_scalars() {
        assert_eq!(ProductId::from_value(&json!("sku-1")), Some(ProductId::from("sku-1")));
        assert_eq!(ProductId::from_value(&json!(42)), Some(ProductId::from("42")));
        assert_eq!(ProductId::from_value(&json!(true)), Some(ProductId::from("true")));
    }

    #[test]
    fn test_from_value_rejects_unidentifiable() {
        assert_eq!(ProductId::from_value(&json!("")), None);
        assert_eq!(ProductId::from_value(&json!(null)), None);
        assert_eq!(ProductId::from_value(&json!(["a"])), None);
    }
}
