//! Cart commands run against a file-backed storage medium.
//!
//! Each invocation opens a fresh [`CartSession`]: the identity is restored
//! from the stored bearer token, the engine hydrates, the command runs, and
//! every change is already persisted by the time the command returns.

use std::path::PathBuf;
use std::rc::Rc;

use naked_pineapple_cart::{
    CartConfig, CartEngine, CartView, ConfigError, FileStorage, IdentitySignal, StorageError,
    StorageMedium, SystemClock, TOKEN_KEY, identity_from_token, stored_identity,
};
use naked_pineapple_core::{Identity, Price, Product};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Cart configuration from the environment is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The storage file could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Price is not a non-negative decimal.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Token carries no usable identity claim.
    #[error("Token has no email or subject claim")]
    InvalidToken,

    /// JSON output could not be rendered.
    #[error("Failed to render cart: {0}")]
    Render(#[from] serde_json::Error),
}

/// A cart engine wired to a storage file and the identity it holds.
pub struct CartSession {
    storage: FileStorage,
    signal: IdentitySignal,
    engine: Rc<CartEngine<FileStorage>>,
}

impl CartSession {
    /// Open the cart stored at `path` using configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `CartCommandError::Config` if a `CART_*` variable is invalid.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CartCommandError> {
        let config = CartConfig::from_env()?;
        Ok(Self::with_config(FileStorage::new(path), config))
    }

    /// Open the cart on `storage` with an explicit configuration.
    #[must_use]
    pub fn with_config(storage: FileStorage, config: CartConfig) -> Self {
        tracing::debug!(path = %storage.path().display(), "Opening cart storage");
        let signal = IdentitySignal::new(stored_identity(&storage));
        let engine = CartEngine::connected(storage.clone(), SystemClock, config, &signal);
        Self {
            storage,
            signal,
            engine,
        }
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns `CartCommandError::InvalidPrice` if `price` is not a
    /// non-negative decimal.
    pub fn add(
        &self,
        id: &str,
        name: &str,
        price: &str,
        image_url: Option<String>,
    ) -> Result<(), CartCommandError> {
        let amount: Decimal = price
            .trim()
            .parse()
            .map_err(|_| CartCommandError::InvalidPrice(price.to_owned()))?;
        if amount.is_sign_negative() {
            return Err(CartCommandError::InvalidPrice(price.to_owned()));
        }

        let mut product = Product::new(id, name, Price::new(amount));
        if let Some(url) = image_url {
            product = product.with_image_url(url);
        }

        tracing::info!(id, "Adding product");
        self.engine.add_to_cart(product);
        Ok(())
    }

    /// Remove a product's line.
    pub fn remove(&self, id: &str) {
        self.engine.remove_from_cart(id);
    }

    /// Set a line's quantity.
    pub fn set_qty(&self, id: &str, qty: f64) {
        self.engine.update_qty(id, qty);
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.engine.clear_cart();
    }

    /// Store `token` and switch to the identity it names.
    ///
    /// # Errors
    ///
    /// Returns `CartCommandError::InvalidToken` if no identity can be read
    /// from the token, or `CartCommandError::Storage` if it cannot be saved.
    pub fn sign_in(&self, token: &str) -> Result<(), CartCommandError> {
        let identity = identity_from_token(token).ok_or(CartCommandError::InvalidToken)?;
        self.storage.set(TOKEN_KEY, token)?;

        tracing::info!(identity = %identity, "Signed in");
        self.signal.set(Some(identity));
        Ok(())
    }

    /// Forget the stored token and switch to the guest cart.
    ///
    /// # Errors
    ///
    /// Returns `CartCommandError::Storage` if the token cannot be removed.
    pub fn sign_out(&self) -> Result<(), CartCommandError> {
        self.storage.remove(TOKEN_KEY)?;

        tracing::info!("Signed out");
        self.signal.set(None);
        Ok(())
    }

    /// Display projection of the cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        self.engine.view()
    }

    /// Identity the cart is keyed by.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.engine.identity()
    }
}

/// Print the cart to stdout.
///
/// # Errors
///
/// Returns `CartCommandError::Render` if JSON encoding fails.
#[allow(clippy::print_stdout)]
pub fn render(
    view: &CartView,
    identity: Option<&Identity>,
    json: bool,
) -> Result<(), CartCommandError> {
    if json {
        let output = serde_json::json!({
            "identity": identity.map(Identity::as_str),
            "cart": view,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let owner = identity.map_or("guest", Identity::as_str);
    if view.is_empty() {
        println!("Cart ({owner}) is empty");
        return Ok(());
    }

    println!("Cart ({owner})");
    for item in &view.items {
        println!(
            "  {:<16} {:<32} x{:<3} {:>14} {:>14}",
            item.id, item.name, item.quantity, item.price, item.line_price
        );
    }
    println!("Subtotal: {} ({} items)", view.subtotal, view.item_count);
    Ok(())
}
