//! Signed-in customer identity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Identity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The input string is empty or only whitespace.
    #[error("identity cannot be empty")]
    Empty,
}

/// Stable identifier of a signed-in customer.
///
/// This is the customer's email when the auth token carries one, otherwise
/// the token's subject claim. Cart records for signed-in customers are keyed
/// by it, so it must never change for the same account.
///
/// ## Examples
///
/// ```
/// use naked_pineapple_core::Identity;
///
/// let id = Identity::from_claims(Some("user@example.com"), Some("42")).unwrap();
/// assert_eq!(id.as_str(), "user@example.com");
///
/// let id = Identity::from_claims(None, Some("42")).unwrap();
/// assert_eq!(id.as_str(), "42");
///
/// assert!(Identity::from_claims(Some(""), None).is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Parse an `Identity` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank. Length is not limited: the
    /// identity only names a storage key.
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        if s.trim().is_empty() {
            return Err(IdentityError::Empty);
        }

        Ok(Self(s.to_owned()))
    }

    /// Pick an identity from token claims, preferring the email.
    ///
    /// Returns `None` when neither claim yields a valid identity.
    #[must_use]
    pub fn from_claims(email: Option<&str>, subject: Option<&str>) -> Option<Self> {
        email
            .and_then(|e| Self::parse(e).ok())
            .or_else(|| subject.and_then(|s| Self::parse(s).ok()))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Identity` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
