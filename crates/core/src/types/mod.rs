//! Core cart types.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod identity;
pub mod item;
pub mod price;
pub mod quantity;

pub use id::ProductId;
pub use identity::{Identity, IdentityError};
pub use item::{CartItem, Product};
pub use price::{CurrencyCode, Price, UnknownCurrency};
pub use quantity::Quantity;
