//! The cart engine: state, hydration and persistence.
//!
//! # Lifecycle
//!
//! 1. On construction and on every identity change the engine *hydrates*:
//!    - signed in: load `cart:<identity>`, fold any guest cart into it
//!      (persisting the merge and deleting the guest record), and replace
//!      state with the result
//!    - guest: load `guest_cart`, discarding it if its expiry has passed
//! 2. Every state change, hydration included, is followed by a write of the
//!    post-reducer state to the current slot. Guest writes push the expiry
//!    out by the configured TTL.
//!
//! Storage failures never escape: they are logged and treated as an absent
//! record, so the worst case is a cart that looks empty or does not survive
//! a reload.
//!
//! # Threading
//!
//! The engine is single-threaded (`!Send`) and uses interior mutability so
//! that an `Rc<CartEngine>` can be shared between UI callbacks and the
//! identity signal. Identity changes that arrive while a hydration is running
//! are queued and processed in order once it finishes.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use naked_pineapple_core::{CartItem, Identity, Price, Product, ProductId};
use tracing::instrument;

use crate::clock::{Clock, SystemClock};
use crate::config::CartConfig;
use crate::identity::{IdentitySignal, SubscriptionId};
use crate::medium::StorageMedium;
use crate::merge::merge_guest_into;
use crate::reducer::{CartAction, CartState};
use crate::store::{CartStore, StoredCart};
use crate::view::CartView;

/// Client-side cart bound to a storage medium.
pub struct CartEngine<S, C = SystemClock> {
    store: CartStore<S, C>,
    state: RefCell<CartState>,
    identity: RefCell<Option<Identity>>,
    pending: RefCell<VecDeque<Option<Identity>>>,
    hydrating: Cell<bool>,
}

impl<S: StorageMedium> CartEngine<S> {
    /// Create an engine using wall-clock time.
    pub fn with_system_clock(medium: S, config: CartConfig, identity: Option<Identity>) -> Self {
        Self::new(medium, SystemClock, config, identity)
    }
}

impl<S: StorageMedium, C: Clock> CartEngine<S, C> {
    /// Create an engine and hydrate it for `identity`.
    pub fn new(medium: S, clock: C, config: CartConfig, identity: Option<Identity>) -> Self {
        let engine = Self {
            store: CartStore::new(medium, clock, config),
            state: RefCell::new(CartState::new()),
            identity: RefCell::new(None),
            pending: RefCell::new(VecDeque::new()),
            hydrating: Cell::new(false),
        };
        engine.identity_changed(identity);
        engine
    }

    /// Create an engine for the signal's current identity and keep it in
    /// sync with later changes.
    pub fn connected(medium: S, clock: C, config: CartConfig, signal: &IdentitySignal) -> Rc<Self>
    where
        S: 'static,
        C: 'static,
    {
        let engine = Rc::new(Self::new(medium, clock, config, signal.current()));
        engine.connect(signal);
        engine
    }

    /// Re-hydrate on every change of `signal`.
    ///
    /// The listener holds the engine weakly; once the last `Rc` is dropped it
    /// does nothing.
    pub fn connect(self: &Rc<Self>, signal: &IdentitySignal) -> SubscriptionId
    where
        S: 'static,
        C: 'static,
    {
        let engine = Rc::downgrade(self);
        signal.subscribe(move |identity| {
            if let Some(engine) = engine.upgrade() {
                engine.identity_changed(identity.cloned());
            }
        })
    }

    // =========================================================================
    // Read side
    // =========================================================================

    /// Cart lines in display order.
    pub fn items(&self) -> Vec<CartItem> {
        self.state.borrow().items().to_vec()
    }

    /// Snapshot of the whole cart state.
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Sum of `price * qty`, recomputed on every call.
    pub fn total(&self) -> Price {
        self.state.borrow().total()
    }

    /// Total units across all lines (cart badge count).
    pub fn item_count(&self) -> u32 {
        self.state.borrow().item_count()
    }

    /// Whether the cart can proceed to checkout. Every line holds at least
    /// one unit, so this is simply a non-empty cart.
    pub fn can_checkout(&self) -> bool {
        !self.state.borrow().is_empty()
    }

    /// Identity the cart is currently keyed by, `None` for guests.
    pub fn identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Display projection with formatted prices.
    pub fn view(&self) -> CartView {
        CartView::from_state(&self.state.borrow(), self.store.config().display_currency)
    }

    /// The underlying store adapter.
    pub const fn store(&self) -> &CartStore<S, C> {
        &self.store
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Add one unit of `product`.
    pub fn add_to_cart(&self, product: Product) {
        self.dispatch(CartAction::Add(product));
    }

    /// Remove the line for `id`, if any.
    pub fn remove_from_cart(&self, id: impl Into<ProductId>) {
        self.dispatch(CartAction::Remove(id.into()));
    }

    /// Set the quantity of the line for `id`, if any. Out-of-range and
    /// non-finite values are normalized.
    pub fn update_qty(&self, id: impl Into<ProductId>, qty: f64) {
        self.dispatch(CartAction::UpdateQty { id: id.into(), qty });
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.dispatch(CartAction::Clear);
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Switch the cart to `identity` and hydrate it.
    ///
    /// Safe to call re-entrantly: a call made while a hydration is running is
    /// queued behind it.
    pub fn identity_changed(&self, identity: Option<Identity>) {
        {
            let mut pending = self.pending.borrow_mut();
            if pending.back() != Some(&identity) {
                pending.push_back(identity);
            }
        }

        if self.hydrating.replace(true) {
            tracing::debug!("Hydration in progress, identity change queued");
            return;
        }

        loop {
            let Some(next) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            self.hydrate(next);
        }

        self.hydrating.set(false);
    }

    #[instrument(skip_all, fields(signed_in = identity.is_some()))]
    fn hydrate(&self, identity: Option<Identity>) {
        let items = match self.store.identity_key(identity.as_ref()) {
            Some(key) => self.load_identified(&key),
            None => self.load_guest(),
        };

        tracing::debug!(items = items.len(), "Hydrating cart");
        *self.identity.borrow_mut() = identity;
        self.dispatch(CartAction::Hydrate(items));
    }

    fn load_identified(&self, key: &str) -> Vec<CartItem> {
        let user_items = self.read_or_absent(key).map(|cart| cart.items).unwrap_or_default();
        let guest_key = self.store.guest_key();

        match self.read_or_absent(guest_key) {
            Some(guest) if !guest.items.is_empty() => {
                let guest_lines = guest.items.len();
                let merged = merge_guest_into(user_items, guest.items);
                tracing::info!(
                    key = %key,
                    guest_lines,
                    merged_lines = merged.len(),
                    "Merged guest cart into customer cart"
                );
                self.write_or_log(key, &merged, false);
                self.remove_or_log(guest_key);
                merged
            }
            _ => user_items,
        }
    }

    fn load_guest(&self) -> Vec<CartItem> {
        let guest_key = self.store.guest_key();

        match self.read_or_absent(guest_key) {
            Some(cart) if cart.is_expired_at(self.store.now()) => {
                tracing::info!(
                    expired_at = ?cart.expires_at,
                    lines = cart.items.len(),
                    "Discarding expired guest cart"
                );
                self.remove_or_log(guest_key);
                Vec::new()
            }
            Some(cart) => cart.items,
            None => Vec::new(),
        }
    }

    // =========================================================================
    // State changes and persistence
    // =========================================================================

    fn dispatch(&self, action: CartAction) {
        let name = action.name();
        {
            let mut state = self.state.borrow_mut();
            let current = std::mem::take(&mut *state);
            *state = current.apply(action);
        }
        tracing::debug!(action = name, "Cart updated");
        self.persist();
    }

    /// Write the current state to the current slot.
    fn persist(&self) {
        let state = self.state.borrow();
        let identity = self.identity.borrow();

        match self.store.identity_key(identity.as_ref()) {
            Some(key) => self.write_or_log(&key, state.items(), false),
            None => self.write_or_log(self.store.guest_key(), state.items(), true),
        }
    }

    fn read_or_absent(&self, key: &str) -> Option<StoredCart> {
        self.store.read(key).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Ignoring unreadable cart record");
            None
        })
    }

    fn write_or_log(&self, key: &str, items: &[CartItem], with_ttl: bool) {
        if let Err(e) = self.store.write(key, items, with_ttl) {
            tracing::warn!(key = %key, error = %e, "Failed to persist cart");
        }
    }

    fn remove_or_log(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key = %key, error = %e, "Failed to remove cart record");
        }
    }
}
