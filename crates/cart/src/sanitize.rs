//! Normalization of cart lines before they enter state or storage.
//!
//! Field-level coercion lives on the core types ([`CartItem::from_value`],
//! [`Quantity`], [`Price`]). This module applies the list-level rules: drop
//! lines that cannot be identified and keep one line per product.

use std::collections::HashMap;

use naked_pineapple_core::{CartItem, ProductId};
use serde_json::Value;

/// Sanitize raw JSON entries as found in a persisted cart.
///
/// Non-object entries and entries without a usable `id` are dropped.
#[must_use]
pub fn sanitize_values(values: &[Value]) -> Vec<CartItem> {
    sanitize(values.iter().filter_map(CartItem::from_value))
}

/// Sanitize typed cart lines.
///
/// Lines with an empty id are dropped. Repeated ids collapse into the first
/// occurrence with their quantities summed (clamped at 99), keeping the
/// position of the first occurrence. Idempotent.
#[must_use]
pub fn sanitize(items: impl IntoIterator<Item = CartItem>) -> Vec<CartItem> {
    let mut out: Vec<CartItem> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for item in items {
        if item.id.as_str().is_empty() {
            continue;
        }
        match index.get(&item.id) {
            Some(&pos) => {
                if let Some(existing) = out.get_mut(pos) {
                    existing.qty = existing.qty.saturating_add(item.qty);
                }
            }
            None => {
                index.insert(item.id.clone(), out.len());
                out.push(item);
            }
        }
    }

    out
}
