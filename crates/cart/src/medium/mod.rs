//! Key-value storage media the cart persists into.
//!
//! A medium is a flat, string-keyed namespace of string values that survives
//! reloads: `localStorage` in the browser, a JSON file for the CLI harness, or
//! an in-memory map for tests.
//!
//! ## Backends
//!
//! - [`MemoryStorage`] - shared in-process map with optional quota
//! - [`FileStorage`] - JSON object file on disk
//! - `LocalStorage` - the browser's `window.localStorage` (wasm32 only)

mod file;
#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

use std::rc::Rc;

pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// A durable string key-value namespace.
pub trait StorageMedium {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium is unavailable or full.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium is unavailable.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: StorageMedium + ?Sized> StorageMedium for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: StorageMedium + ?Sized> StorageMedium for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
