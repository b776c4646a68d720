//! In-process storage medium.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::StorageMedium;
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl Inner {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }
}

/// In-memory storage medium.
///
/// Clones share the same entries, so a test can hand one handle to the engine
/// and inspect the records through another. Quota and disabled modes mimic
/// the ways browser storage refuses writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStorage {
    /// Create an empty, unlimited store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that refuses writes past `bytes` of keys plus values.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.inner.borrow_mut().quota_bytes = Some(bytes);
        storage
    }

    /// Turn the whole medium off or back on.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// Raw value under `key`, bypassing the disabled flag.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Store a raw value under `key`, bypassing quota and the disabled flag.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_owned(), value.to_owned());
    }

    /// Whether anything is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// All stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    fn check_enabled(&self) -> Result<(), StorageError> {
        if self.inner.borrow().disabled {
            Err(StorageError::Unavailable("storage is disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl StorageMedium for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_enabled()?;
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_enabled()?;
        let mut inner = self.inner.borrow_mut();
        if inner
            .quota_bytes
            .is_some_and(|quota| inner.used_bytes_with(key, value) > quota)
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
            });
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_enabled()?;
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set("k", "v").unwrap();
        assert_eq!(handle.get("k").unwrap().as_deref(), Some("v"));

        handle.remove("k").unwrap();
        assert!(!storage.contains("k"));
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        assert!(MemoryStorage::new().remove("nope").is_ok());
    }

    #[test]
    fn test_quota_exceeded() {
        let storage = MemoryStorage::with_quota(10);
        storage.set("a", "1234").unwrap();
        assert!(matches!(
            storage.set("b", "123456789"),
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert!(!storage.contains("b"));

        // Replacing a value only counts the new size.
        storage.set("a", "12345678").unwrap();
    }

    #[test]
    fn test_disabled() {
        let storage = MemoryStorage::new();
        storage.insert_raw("k", "v");
        storage.set_disabled(true);

        assert!(matches!(storage.get("k"), Err(StorageError::Unavailable(_))));
        assert!(storage.set("k", "w").is_err());
        assert!(storage.remove("k").is_err());
        assert_eq!(storage.raw("k").as_deref(), Some("v"));

        storage.set_disabled(false);
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
