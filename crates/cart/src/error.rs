//! Error types for cart persistence.
//!
//! None of these ever reach the UI layer. The store adapter reports them and
//! the engine logs them and carries on as if the record were absent.

use thiserror::Error;

/// Failure of the underlying key-value storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or not reachable (private mode, blocked cookies).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The medium refused a write because it is full.
    #[error("Storage quota exceeded writing {key}")]
    QuotaExceeded {
        /// Key that was being written.
        key: String,
    },

    /// File-backed storage failed to read or write its file.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File-backed storage holds something other than a string map.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),
}

/// Failure at the cart store adapter boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage medium failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A persisted record could not be decoded.
    #[error("Malformed cart record under {key}: {reason}")]
    Decode {
        /// Storage key of the record.
        key: String,
        /// Why decoding failed.
        reason: String,
    },

    /// The guest expiry would fall outside the representable time range.
    #[error("Guest cart expiry out of range (TTL {ttl_secs}s)")]
    ExpiryOutOfRange {
        /// Configured TTL in seconds.
        ttl_secs: i64,
    },

    /// A cart could not be serialized.
    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for store adapter operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Decode {
            key: "guest_cart".to_string(),
            reason: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed cart record under guest_cart: expected value"
        );

        let err = StoreError::from(StorageError::QuotaExceeded {
            key: "cart:a@b.c".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Storage error: Storage quota exceeded writing cart:a@b.c"
        );
    }
}
