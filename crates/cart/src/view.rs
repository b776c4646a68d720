//! Display projection of the cart for templates and the CLI.

use naked_pineapple_core::{CartItem, CurrencyCode};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::reducer::CartState;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: u8,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    /// Unformatted subtotal, rounded to cents.
    pub subtotal_amount: Decimal,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self::from_state(&CartState::new(), currency)
    }

    /// Project `state`, formatting every amount in `currency`.
    #[must_use]
    pub fn from_state(state: &CartState, currency: CurrencyCode) -> Self {
        let total = state.total();
        Self {
            items: state
                .items()
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            subtotal: total.display(currency),
            subtotal_amount: total.rounded(),
            item_count: state.item_count(),
        }
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn new(item: &CartItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image_url: item.image_url.clone(),
            quantity: item.qty.get(),
            price: item.price.display(currency),
            line_price: item.line_total().display(currency),
        }
    }
}

#[cfg(test)]
mod tests {
    use naked_pineapple_core::{Price, Product, ProductId};

    use super::*;
    use crate::reducer::CartAction;

    #[test]
    fn test_empty_view() {
        let view = CartView::empty(CurrencyCode::USD);
        assert!(view.is_empty());
        assert_eq!(view.subtotal, "0.00 USD");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_formats_lines_and_subtotal() {
        let state = CartState::new()
            .apply(CartAction::Add(
                Product::new("a", "Pineapple Soap", Price::from_f64(12.5))
                    .with_image_url("https://cdn.example.com/soap.png"),
            ))
            .apply(CartAction::UpdateQty {
                id: ProductId::from("a"),
                qty: 3.0,
            });

        let view = CartView::from_state(&state, CurrencyCode::EUR);

        assert_eq!(view.subtotal, "37.50 EUR");
        assert_eq!(view.subtotal_amount, Decimal::new(3750, 2));
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items[0].price, "12.50 EUR");
        assert_eq!(view.items[0].line_price, "37.50 EUR");
        assert_eq!(view.items[0].quantity, 3);
        assert_eq!(
            view.items[0].image_url.as_deref(),
            Some("https://cdn.example.com/soap.png")
        );
    }
}
