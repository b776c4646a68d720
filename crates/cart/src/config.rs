//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_GUEST_KEY` - Storage key of the guest cart (default: `guest_cart`)
//! - `CART_USER_KEY_PREFIX` - Prefix of signed-in cart keys (default: `cart:`)
//! - `CART_GUEST_TTL_SECS` - Guest cart lifetime in seconds (default: 604800, 7 days)
//! - `CART_DISPLAY_CURRENCY` - Currency code shown next to prices (default: USD)

use chrono::{TimeDelta, Utc};
use naked_pineapple_core::CurrencyCode;
use thiserror::Error;

/// Default storage key of the guest cart.
pub const DEFAULT_GUEST_KEY: &str = "guest_cart";

/// Default prefix of signed-in cart keys (`cart:<identity>`).
pub const DEFAULT_USER_KEY_PREFIX: &str = "cart:";

/// Default guest cart lifetime: 7 days.
pub const GUEST_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Storage key of the guest cart
    pub guest_key: String,
    /// Prefix prepended to the identity for signed-in cart keys
    pub user_key_prefix: String,
    /// How long an untouched guest cart survives
    pub guest_ttl: TimeDelta,
    /// Currency shown in formatted prices
    pub display_currency: CurrencyCode,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            guest_key: DEFAULT_GUEST_KEY.to_string(),
            user_key_prefix: DEFAULT_USER_KEY_PREFIX.to_string(),
            guest_ttl: TimeDelta::milliseconds(GUEST_TTL_MS),
            display_currency: CurrencyCode::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but blank or unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but blank or unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let guest_key = non_blank(&lookup, "CART_GUEST_KEY")?.unwrap_or(defaults.guest_key);
        let user_key_prefix =
            non_blank(&lookup, "CART_USER_KEY_PREFIX")?.unwrap_or(defaults.user_key_prefix);

        let guest_ttl = match non_blank(&lookup, "CART_GUEST_TTL_SECS")? {
            Some(raw) => parse_ttl(&raw)?,
            None => defaults.guest_ttl,
        };

        let display_currency = match non_blank(&lookup, "CART_DISPLAY_CURRENCY")? {
            Some(raw) => raw.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("CART_DISPLAY_CURRENCY".to_string(), e.to_string())
            })?,
            None => defaults.display_currency,
        };

        Ok(Self {
            guest_key,
            user_key_prefix,
            guest_ttl,
            display_currency,
        })
    }
}

fn non_blank(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<String>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            "must not be blank".to_string(),
        )),
        Some(value) => Ok(Some(value)),
    }
}

fn parse_ttl(raw: &str) -> Result<TimeDelta, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("CART_GUEST_TTL_SECS".to_string(), reason);

    let secs = raw.trim().parse::<i64>().map_err(|e| invalid(e.to_string()))?;
    if secs <= 0 {
        return Err(invalid("must be a positive number of seconds".to_string()));
    }
    let ttl = TimeDelta::try_seconds(secs).ok_or_else(|| invalid("out of range".to_string()))?;
    if Utc::now().checked_add_signed(ttl).is_none() {
        return Err(invalid("expiry would overflow the calendar".to_string()));
    }
    Ok(ttl)
}
