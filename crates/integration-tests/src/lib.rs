//! Integration tests for Naked Pineapple.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p naked-pineapple-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - Guest, sign-in, merge and sign-out flows end to end
//! - `cart_properties` - Property tests over the reducer and the merge
//! - `file_storage` - The same flows against a JSON file on disk
//!
//! Everything runs in-process: storage is a shared [`MemoryStorage`] and time
//! is a [`ManualClock`], so no browser or server is needed.

use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use naked_pineapple_cart::{
    CartConfig, CartEngine, IdentitySignal, ManualClock, MemoryStorage, StorageMedium, TOKEN_KEY,
    stored_identity,
};
use naked_pineapple_core::{CartItem, Identity, Price, Product};
use serde_json::Value;

/// 2023-11-14T22:13:20Z, the instant every test starts at.
pub const START_MS: i64 = 1_700_000_000_000;

/// The engine type every test drives.
pub type TestEngine = CartEngine<MemoryStorage, ManualClock>;

/// One browser profile: shared storage, a controllable clock and the auth
/// layer's identity signal.
pub struct TestContext {
    pub storage: MemoryStorage,
    pub clock: ManualClock,
    pub signal: IdentitySignal,
    pub config: CartConfig,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// A fresh profile with empty storage, signed out.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// A profile over existing storage, signed in if it holds a token.
    #[must_use]
    pub fn with_storage(storage: MemoryStorage) -> Self {
        let signal = IdentitySignal::new(stored_identity(&storage));
        Self {
            storage,
            clock: ManualClock::new(start()),
            signal,
            config: CartConfig::default(),
        }
    }

    /// Mount a cart engine, as a page load does.
    #[must_use]
    pub fn mount(&self) -> Rc<TestEngine> {
        CartEngine::connected(
            self.storage.clone(),
            self.clock.clone(),
            self.config.clone(),
            &self.signal,
        )
    }

    /// Sign in the way the storefront auth layer does: store a token, then
    /// publish the identity.
    pub fn sign_in(&self, email: &str) {
        self.storage.insert_raw(TOKEN_KEY, &token_for(email));
        self.signal.set(Identity::parse(email).ok());
    }

    /// Drop the token and publish the guest identity.
    pub fn sign_out(&self) {
        self.storage.remove(TOKEN_KEY).ok();
        self.signal.set(None);
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        self.clock.advance(delta);
    }

    /// Parsed JSON of the record under `key`.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<Value> {
        self.storage
            .raw(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// Write a raw record, bypassing the cart.
    pub fn seed(&self, key: &str, value: &Value) {
        self.storage.insert_raw(key, &value.to_string());
    }
}

/// The clock's starting instant.
#[must_use]
pub fn start() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(START_MS).unwrap_or_default()
}

/// Unsigned JWT carrying an `email` claim.
#[must_use]
pub fn token_for(email: &str) -> String {
    let claims = serde_json::json!({ "email": email, "sub": "customer" });
    format!(
        "{}.{}.unsigned",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// A product priced in whole currency units.
#[must_use]
pub fn product(id: &str, price: u32) -> Product {
    Product::new(id, format!("Product {id}"), Price::new(price.into()))
}

/// `(id, qty)` pairs of `items`, for compact assertions.
#[must_use]
pub fn lines(items: &[CartItem]) -> Vec<(String, u8)> {
    items
        .iter()
        .map(|item| (item.id.to_string(), item.qty.get()))
        .collect()
}

/// Owned `(id, qty)` pairs from literals.
#[must_use]
pub fn expect(pairs: &[(&str, u8)]) -> Vec<(String, u8)> {
    pairs
        .iter()
        .map(|(id, qty)| ((*id).to_string(), *qty))
        .collect()
}
