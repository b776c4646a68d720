//! Naked Pineapple Cart - client-side cart state and persistence.
//!
//! The cart lives in the shopper's browser (or any other host with a
//! key/value store) and survives reloads:
//!
//! - Guests get a single `guest_cart` record that expires a week after the
//!   last change.
//! - Signed-in customers get a `cart:<identity>` record with no expiry.
//! - Signing in folds the guest cart into the customer's cart exactly once.
//!
//! # Modules
//!
//! - [`engine`] - [`CartEngine`], the stateful cart the UI talks to
//! - [`reducer`] - Pure state transitions over [`CartAction`]s
//! - [`store`] - Record encoding on top of a [`StorageMedium`]
//! - [`medium`] - Storage backends (memory, file, browser `localStorage`)
//! - [`identity`] - Observable identity and JWT claim extraction
//! - [`merge`] / [`sanitize`] - Cart line normalization
//! - [`view`] - Formatted projection for display
//!
//! # Example
//!
//! ```
//! use naked_pineapple_cart::{CartConfig, CartEngine, MemoryStorage};
//! use naked_pineapple_core::{Price, Product};
//!
//! let cart = CartEngine::with_system_clock(MemoryStorage::new(), CartConfig::default(), None);
//! cart.add_to_cart(Product::new("soap", "Pineapple Soap", Price::from_f64(12.5)));
//! cart.update_qty("soap", 2.0);
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.view().subtotal, "25.00 USD");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod medium;
pub mod merge;
pub mod reducer;
pub mod sanitize;
pub mod store;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CartConfig, ConfigError};
pub use engine::CartEngine;
pub use error::{StorageError, StoreError, StoreResult};
pub use identity::{IdentitySignal, SubscriptionId, TOKEN_KEY, identity_from_token, stored_identity};
#[cfg(target_arch = "wasm32")]
pub use medium::LocalStorage;
pub use medium::{FileStorage, MemoryStorage, StorageMedium};
pub use reducer::{CartAction, CartState};
pub use store::{CartStore, StoredCart};
pub use view::{CartItemView, CartView};
