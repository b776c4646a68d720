//! Property tests for cart invariants that must hold for any action sequence.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use naked_pineapple_cart::merge::merge_guest_into;
use naked_pineapple_cart::sanitize::sanitize;
use naked_pineapple_cart::{
    CartAction, CartConfig, CartState, CartStore, ManualClock, MemoryStorage,
};
use naked_pineapple_core::{CartItem, Price, Product, ProductId, Quantity};
use naked_pineapple_integration_tests::start;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn arbitrary_id() -> impl Strategy<Value = String> {
    (0..6u8).prop_map(|n| format!("p{n}"))
}

fn arbitrary_price() -> impl Strategy<Value = Price> {
    (0..100_000i64).prop_map(|cents| Price::new(Decimal::new(cents, 2)))
}

fn arbitrary_action() -> impl Strategy<Value = CartAction> {
    prop_oneof![
        4 => (arbitrary_id(), arbitrary_price())
            .prop_map(|(id, price)| CartAction::Add(Product::new(id.clone(), id, price))),
        1 => arbitrary_id().prop_map(|id| CartAction::Remove(ProductId::from(id))),
        3 => (arbitrary_id(), prop_oneof![
                -500.0..500.0f64,
                Just(f64::NAN),
                Just(f64::INFINITY),
            ])
            .prop_map(|(id, qty)| CartAction::UpdateQty { id: ProductId::from(id), qty }),
        1 => Just(CartAction::Clear),
    ]
}

fn arbitrary_item() -> impl Strategy<Value = CartItem> {
    (arbitrary_id(), arbitrary_price(), 1..=99u32).prop_map(|(id, price, qty)| CartItem {
        id: ProductId::from(id.as_str()),
        name: id,
        price,
        image_url: None,
        qty: Quantity::new(qty),
    })
}

/// Prices at every scale a decimal can carry, well beyond cents.
fn arbitrary_stored_price() -> impl Strategy<Value = Price> {
    (0..1_000_000_000_000_000_000i64, 0..=20u32)
        .prop_map(|(mantissa, scale)| Price::new(Decimal::new(mantissa, scale)))
}

fn arbitrary_stored_item() -> impl Strategy<Value = CartItem> {
    (
        prop_oneof![1 => Just(String::new()), 8 => "[a-z0-9:_-]{1,8}"],
        any::<String>(),
        arbitrary_stored_price(),
        proptest::option::of("https://[a-z]{1,10}\\.example/[a-z0-9/]{0,16}"),
        1..=99u32,
    )
        .prop_map(|(id, name, price, image_url, qty)| CartItem {
            id: ProductId::from(id),
            name,
            price,
            image_url,
            qty: Quantity::new(qty),
        })
}

fn arbitrary_cart() -> impl Strategy<Value = Vec<CartItem>> {
    prop::collection::vec(arbitrary_item(), 0..8).prop_map(sanitize)
}

proptest! {
    #[test]
    fn prop_reducer_keeps_cart_well_formed(
        actions in prop::collection::vec(arbitrary_action(), 0..40)
    ) {
        let mut state = CartState::new();
        for action in actions {
            state = state.apply(action);

            let ids: HashSet<_> = state.items().iter().map(|i| i.id.clone()).collect();
            prop_assert_eq!(ids.len(), state.items().len(), "duplicate line");

            for item in state.items() {
                prop_assert!((1..=99).contains(&item.qty.get()), "qty {} out of range", item.qty.get());
            }

            let expected: Decimal = state
                .items()
                .iter()
                .map(|i| i.price.amount() * Decimal::from(i.qty.get()))
                .sum();
            prop_assert_eq!(state.total().amount(), expected);
        }
    }

    #[test]
    fn prop_merge_preserves_user_order_and_sums(
        user in arbitrary_cart(),
        guest in arbitrary_cart(),
    ) {
        let merged = merge_guest_into(user.clone(), guest.clone());

        // Customer lines lead, in their original order.
        for (merged_line, user_line) in merged.iter().zip(&user) {
            prop_assert_eq!(&merged_line.id, &user_line.id);
        }

        let all_ids: HashSet<_> = user.iter().chain(&guest).map(|i| i.id.clone()).collect();
        prop_assert_eq!(merged.len(), all_ids.len());

        for line in &merged {
            let total: u32 = user
                .iter()
                .chain(&guest)
                .filter(|i| i.id == line.id)
                .map(|i| u32::from(i.qty.get()))
                .sum();
            prop_assert_eq!(u32::from(line.qty.get()), total.min(99));
        }
    }

    #[test]
    fn prop_sanitize_is_idempotent(items in prop::collection::vec(arbitrary_item(), 0..12)) {
        let once = sanitize(items);
        let twice = sanitize(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_store_round_trip_is_lossless(
        items in prop::collection::vec(arbitrary_stored_item(), 0..10),
        with_ttl in any::<bool>(),
    ) {
        let store = CartStore::new(
            MemoryStorage::new(),
            ManualClock::new(start()),
            CartConfig::default(),
        );

        store.write("cart:round-trip", &items, with_ttl).unwrap();
        let stored = store.read("cart:round-trip").unwrap().unwrap();

        prop_assert_eq!(stored.items, sanitize(items));
        prop_assert_eq!(stored.expires_at.is_some(), with_ttl);
    }

    #[test]
    fn prop_hydrate_restores_exact_state(cart in arbitrary_cart()) {
        let state = CartState::new().apply(CartAction::Hydrate(cart.clone()));
        prop_assert_eq!(state.items(), cart.as_slice());
    }
}
