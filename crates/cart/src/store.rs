//! Persistent cart store adapter.
//!
//! Reads and writes named cart records on a [`StorageMedium`]:
//!
//! ```text
//! guest_cart          → {"items": [...], "expiresAt": 1735689600000}
//! cart:{identity}     → {"items": [...]}
//! ```
//!
//! Two historical encodings are accepted on read: the envelope above, and a
//! bare array of items written by the first storefront release. Every item
//! read or written passes through [`sanitize`](crate::sanitize).
//!
//! Failures come back as [`StoreError`]. Callers decide what to do with them;
//! the cart engine treats every failure as "no record".

use chrono::{DateTime, Utc};
use naked_pineapple_core::{CartItem, Identity};
use serde::Serialize;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::config::CartConfig;
use crate::error::{StoreError, StoreResult};
use crate::medium::StorageMedium;
use crate::sanitize::{sanitize, sanitize_values};

/// A cart record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredCart {
    pub items: Vec<CartItem>,
    /// Set only on guest records. `None` means the record never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredCart {
    /// Whether the record's expiry lies strictly before `now`, compared at
    /// millisecond precision.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| at.timestamp_millis() < now.timestamp_millis())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    items: &'a [CartItem],
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    expires_at: Option<DateTime<Utc>>,
}

/// Cart store adapter over a storage medium.
#[derive(Debug, Clone)]
pub struct CartStore<S, C = SystemClock> {
    medium: S,
    clock: C,
    config: CartConfig,
}

impl<S: StorageMedium, C: Clock> CartStore<S, C> {
    /// Create a store adapter.
    pub const fn new(medium: S, clock: C, config: CartConfig) -> Self {
        Self {
            medium,
            clock,
            config,
        }
    }

    /// Key of the guest record.
    pub fn guest_key(&self) -> &str {
        &self.config.guest_key
    }

    /// Key of the record owned by `identity`, if signed in.
    pub fn identity_key(&self, identity: Option<&Identity>) -> Option<String> {
        identity.map(|id| format!("{}{}", self.config.user_key_prefix, id.as_str()))
    }

    /// The adapter's configuration.
    pub const fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The underlying medium.
    pub const fn medium(&self) -> &S {
        &self.medium
    }

    /// Current time according to the adapter's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Read the record under `key`.
    ///
    /// Returns `Ok(None)` when nothing (or an empty string) is stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the medium fails and
    /// `StoreError::Decode` if the record is not a cart in either encoding.
    pub fn read(&self, key: &str) -> StoreResult<Option<StoredCart>> {
        match self.medium.get(key)? {
            Some(raw) if !raw.is_empty() => decode(key, &raw).map(Some),
            _ => Ok(None),
        }
    }

    /// Write `items` under `key`, stamping a fresh expiry when `with_ttl`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ExpiryOutOfRange` if `now + TTL` overflows the
    /// calendar, or another `StoreError` if encoding fails or the medium
    /// refuses the write.
    pub fn write(&self, key: &str, items: &[CartItem], with_ttl: bool) -> StoreResult<()> {
        let items = sanitize(items.iter().cloned());
        let expires_at = if with_ttl {
            let ttl = self.config.guest_ttl;
            let at = self.clock.now().checked_add_signed(ttl).ok_or(
                StoreError::ExpiryOutOfRange {
                    ttl_secs: ttl.num_seconds(),
                },
            )?;
            Some(at)
        } else {
            None
        };
        let json = serde_json::to_string(&Envelope {
            items: &items,
            expires_at,
        })?;
        self.medium.set(key, &json)?;
        Ok(())
    }

    /// Delete the record under `key`. Missing records are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the medium fails.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.medium.remove(key)?;
        Ok(())
    }
}

fn decode(key: &str, raw: &str) -> StoreResult<StoredCart> {
    let malformed = |reason: String| StoreError::Decode {
        key: key.to_owned(),
        reason,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;

    match value {
        Value::Array(items) => Ok(StoredCart {
            items: sanitize_values(&items),
            expires_at: None,
        }),
        Value::Object(record) => {
            let items = match record.get("items") {
                Some(Value::Array(items)) => sanitize_values(items),
                None | Some(Value::Null) => Vec::new(),
                Some(_) => return Err(malformed("items is not an array".to_string())),
            };
            let expires_at = record.get("expiresAt").and_then(millis_to_datetime);
            Ok(StoredCart { items, expires_at })
        }
        _ => Err(malformed("expected an object or an array".to_string())),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn millis_to_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let millis = value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
    DateTime::from_timestamp_millis(millis)
}
