//! Guest-into-customer cart merge.

use std::collections::HashMap;

use naked_pineapple_core::{CartItem, ProductId};

/// Merge a guest cart into a signed-in customer's cart.
///
/// Customer lines come first in their stored order. A guest line for a
/// product the customer already has adds its quantity (clamped at 99) to the
/// customer's line; the other guest lines are appended in guest order. The
/// customer's name, price and image win for shared products.
#[must_use]
pub fn merge_guest_into(user: Vec<CartItem>, guest: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged = user;
    let mut index: HashMap<ProductId, usize> = merged
        .iter()
        .enumerate()
        .map(|(pos, item)| (item.id.clone(), pos))
        .collect();

    for item in guest {
        match index.get(&item.id) {
            Some(&pos) => {
                if let Some(existing) = merged.get_mut(pos) {
                    existing.qty = existing.qty.saturating_add(item.qty);
                }
            }
            None => {
                index.insert(item.id.clone(), merged.len());
                merged.push(item);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use naked_pineapple_core::{Price, Quantity};

    use super::*;

    fn item(id: &str, qty: u32) -> CartItem {
        CartItem {
            id: ProductId::from(id),
            name: id.to_string(),
            price: Price::from_f64(1.0),
            image_url: None,
            qty: Quantity::new(qty),
        }
    }

    fn summary(items: &[CartItem]) -> Vec<(&str, u8)> {
        items.iter().map(|i| (i.id.as_str(), i.qty.get())).collect()
    }

    #[test]
    fn test_user_first_then_guest_only() {
        let merged = merge_guest_into(
            vec![item("B", 3)],
            vec![item("A", 2), item("B", 1)],
        );
        assert_eq!(summary(&merged), [("B", 4), ("A", 2)]);
    }

    #[test]
    fn test_shared_quantities_clamp() {
        let merged = merge_guest_into(vec![item("A", 90)], vec![item("A", 20)]);
        assert_eq!(summary(&merged), [("A", 99)]);
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(
            summary(&merge_guest_into(Vec::new(), vec![item("A", 1), item("C", 2)])),
            [("A", 1), ("C", 2)]
        );
        assert_eq!(
            summary(&merge_guest_into(vec![item("A", 1)], Vec::new())),
            [("A", 1)]
        );
    }

    #[test]
    fn test_user_details_win() {
        let mut user_line = item("A", 1);
        user_line.name = "Current name".to_string();
        let mut guest_line = item("A", 1);
        guest_line.name = "Stale name".to_string();

        let merged = merge_guest_into(vec![user_line], vec![guest_line]);
        assert_eq!(merged[0].name, "Current name");
    }
}
