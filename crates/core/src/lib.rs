//! Naked Pineapple Core - Shared cart types.
//!
//! This crate provides the types shared by the cart engine and its hosts:
//! - `cart` - Client-side cart state, persistence and guest/customer merge
//! - `cli` - Developer harness that drives the cart against a file store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no clocks.
//! Loosely-typed input (old persisted carts, form values) is coerced here so
//! that every consumer shares one definition of a valid cart line.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities and identities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
