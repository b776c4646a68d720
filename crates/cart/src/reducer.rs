//! Cart state and the pure reducer over cart actions.

use naked_pineapple_core::{CartItem, Price, Product, ProductId, Quantity};

use crate::sanitize::sanitize;

/// A change to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of a product, appending a line if it is new.
    Add(Product),
    /// Drop the line for a product.
    Remove(ProductId),
    /// Set a line's quantity. Non-finite input counts as 1.
    UpdateQty { id: ProductId, qty: f64 },
    /// Empty the cart.
    Clear,
    /// Replace the whole cart with persisted lines. Only issued by hydration.
    Hydrate(Vec<CartItem>),
}

impl CartAction {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::UpdateQty { .. } => "update_qty",
            Self::Clear => "clear",
            Self::Hydrate(_) => "hydrate",
        }
    }
}

/// In-memory cart: lines in display order, at most one per product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * qty` over all lines, unrounded.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| u32::from(item.qty)).sum()
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    /// Apply `action`, returning the next state. Performs no I/O.
    #[must_use]
    pub fn apply(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add(product) => {
                match self.items.iter_mut().find(|item| item.id == product.id) {
                    Some(existing) => existing.qty = existing.qty.increment(),
                    None => self.items.push(CartItem::from(product)),
                }
            }
            CartAction::Remove(id) => self.items.retain(|item| item.id != id),
            CartAction::UpdateQty { id, qty } => {
                let qty = Quantity::from_f64(qty);
                if let Some(existing) = self.items.iter_mut().find(|item| item.id == id) {
                    existing.qty = qty;
                }
            }
            CartAction::Clear => self.items.clear(),
            CartAction::Hydrate(items) => self.items = sanitize(items),
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, price: f64) -> Product {
        Product::new(id, format!("Product {id}"), Price::from_f64(price))
    }

    fn update(id: &str, qty: f64) -> CartAction {
        CartAction::UpdateQty {
            id: ProductId::from(id),
            qty,
        }
    }

    #[test]
    fn test_add_same_product_twice_increments() {
        let state = CartState::new()
            .apply(CartAction::Add(product("a", 1.0)))
            .apply(CartAction::Add(product("a", 1.0)));

        assert_eq!(state.items().len(), 1);
        assert_eq!(state.get("a").unwrap().qty.get(), 2);
    }

    #[test]
    fn test_add_appends_in_order() {
        let state = CartState::new()
            .apply(CartAction::Add(product("b", 1.0)))
            .apply(CartAction::Add(product("a", 1.0)));

        let ids: Vec<_> = state.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_add_clamps_at_max() {
        let mut state = CartState::new()
            .apply(CartAction::Add(product("a", 1.0)))
            .apply(update("a", 99.0));
        state = state.apply(CartAction::Add(product("a", 1.0)));

        assert_eq!(state.get("a").unwrap().qty, Quantity::MAX);
    }

    #[test]
    fn test_update_qty_clamps() {
        let state = CartState::new().apply(CartAction::Add(product("a", 1.0)));

        let state = state.apply(update("a", 150.0));
        assert_eq!(state.get("a").unwrap().qty.get(), 99);

        let state = state.apply(update("a", 0.0));
        assert_eq!(state.get("a").unwrap().qty.get(), 1);

        let state = state.apply(update("a", 7.0)).apply(update("a", f64::NAN));
        assert_eq!(state.get("a").unwrap().qty.get(), 1);

        let state = state.apply(update("a", 4.6));
        assert_eq!(state.get("a").unwrap().qty.get(), 5);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let state = CartState::new().apply(CartAction::Add(product("a", 1.0)));

        assert_eq!(state.clone().apply(update("zzz", 5.0)), state);
        assert_eq!(
            state.clone().apply(CartAction::Remove(ProductId::from("zzz"))),
            state
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let state = CartState::new()
            .apply(CartAction::Add(product("a", 1.0)))
            .apply(CartAction::Add(product("b", 1.0)))
            .apply(CartAction::Remove(ProductId::from("a")));

        assert!(state.get("a").is_none());
        assert!(state.get("b").is_some());
        assert!(state.apply(CartAction::Clear).is_empty());
    }

    #[test]
    fn test_hydrate_replaces_and_sanitizes() {
        let dup = CartItem::from(product("a", 1.0));
        let state = CartState::new()
            .apply(CartAction::Add(product("z", 1.0)))
            .apply(CartAction::Hydrate(vec![dup.clone(), dup]));

        assert!(state.get("z").is_none());
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.get("a").unwrap().qty.get(), 2);
    }

    #[test]
    fn test_total_and_item_count() {
        let state = CartState::new()
            .apply(CartAction::Add(product("a", 10.0)))
            .apply(update("a", 2.0))
            .apply(CartAction::Add(product("b", 5.0)))
            .apply(update("b", 3.0));

        assert_eq!(state.total().amount(), Decimal::new(35, 0));
        assert_eq!(state.item_count(), 5);

        let state = state.apply(CartAction::Remove(ProductId::from("a")));
        assert_eq!(state.total().amount(), Decimal::new(15, 0));
    }

    #[test]
    fn test_total_is_exact() {
        let state = CartState::new()
            .apply(CartAction::Add(product("a", 0.1)))
            .apply(update("a", 3.0));

        assert_eq!(state.total().amount(), Decimal::new(3, 1));
    }
}
