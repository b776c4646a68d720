//! Catalogue products and cart lines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Price, ProductId, Quantity};

/// A product as offered to the cart by the catalogue pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product without an image.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: None,
        }
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// One line of a cart.
///
/// Serialized with camelCase keys (`imageUrl`) to stay compatible with carts
/// written by earlier storefront builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub qty: Quantity,
}

impl CartItem {
    /// Price of the whole line (`price * qty`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }

    /// Coerce a loosely-typed JSON object into a cart line.
    ///
    /// Fields of the wrong type are dropped or coerced rather than rejected.
    /// Returns `None` if `value` is not an object or has no usable `id`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id").and_then(ProductId::from_value)?;

        let name = match obj.get("name") {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            _ => String::new(),
        };

        Some(Self {
            id,
            name,
            price: obj.get("price").map_or(Price::ZERO, Price::from_value),
            image_url: obj
                .get("imageUrl")
                .and_then(Value::as_str)
                .map(str::to_owned),
            qty: obj.get("qty").map_or(Quantity::ONE, Quantity::from_value),
        })
    }
}

impl From<Product> for CartItem {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            qty: Quantity::ONE,
        }
    }
}
