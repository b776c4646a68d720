//! Signed-in identity as seen by the cart.
//!
//! The storefront's auth layer keeps a bearer token in storage and exposes the
//! current customer through an [`IdentitySignal`]. The cart never reads the
//! token itself: hosts resolve it with [`identity_from_token`] and publish the
//! result on the signal, which the engine subscribes to.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use naked_pineapple_core::Identity;
use serde_json::Value;

use crate::medium::StorageMedium;

/// Storage key under which the auth layer keeps the bearer token.
pub const TOKEN_KEY: &str = "token";

type Listener = Rc<dyn Fn(Option<&Identity>)>;

/// Handle returned by [`IdentitySignal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Observable current identity.
///
/// Listeners run synchronously on every change of value. A `set` issued from
/// inside a listener is delivered after the current notification round
/// finishes, so every listener sees changes in the order they happened.
pub struct IdentitySignal {
    current: RefCell<Option<Identity>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
    pending: RefCell<VecDeque<Option<Identity>>>,
}

impl IdentitySignal {
    /// Create a signal holding `initial`.
    #[must_use]
    pub fn new(initial: Option<Identity>) -> Self {
        Self {
            current: RefCell::new(initial),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            notifying: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// The current identity, `None` for guests.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Publish a new identity. Returns `false` if the value did not change,
    /// in which case no listener runs.
    pub fn set(&self, identity: Option<Identity>) -> bool {
        {
            let mut current = self.current.borrow_mut();
            if *current == identity {
                return false;
            }
            current.clone_from(&identity);
        }

        self.pending.borrow_mut().push_back(identity);
        if self.notifying.replace(true) {
            return true;
        }

        loop {
            let Some(next) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            let listeners: Vec<Listener> = self
                .listeners
                .borrow()
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            for listener in listeners {
                listener(next.as_ref());
            }
        }

        self.notifying.set(false);
        true
    }

    /// Register `listener` to run on every identity change.
    pub fn subscribe(&self, listener: impl Fn(Option<&Identity>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Default for IdentitySignal {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for IdentitySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySignal")
            .field("current", &self.current.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Extract the customer identity from a JWT without verifying it.
///
/// The token is only used to pick the cart slot; the backend verifies it on
/// every request that matters. Prefers the `email` claim, falls back to
/// `sub`. Malformed tokens yield `None`.
#[must_use]
pub fn identity_from_token(token: &str) -> Option<Identity> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    Identity::from_claims(
        claims.get("email").and_then(Value::as_str),
        claims.get("sub").and_then(Value::as_str),
    )
}

/// Resolve the identity from the bearer token kept in `medium`.
///
/// A missing token, unreadable storage or malformed token all mean guest.
pub fn stored_identity(medium: &impl StorageMedium) -> Option<Identity> {
    match medium.get(TOKEN_KEY) {
        Ok(token) => token.as_deref().and_then(identity_from_token),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read auth token, treating as guest");
            None
        }
    }
}
