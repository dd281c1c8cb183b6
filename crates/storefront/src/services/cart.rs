//! Cart session.
//!
//! Owns the shopper's [`Cart`]. Every mutation goes to the backend and the
//! server's answer replaces local state; nothing is merged optimistically.
//!
//! # Pending-cart snapshot
//!
//! An anonymous shopper who tries to check out has their cart written to the
//! session area (`checkoutCart`) before being sent to login. The first
//! [`CartSession::load`] with a token consumes it: both snapshot keys are
//! deleted, the server cart is cleared and each line is re-added. The older
//! local-area key `pendingCart` is honoured on read.

use chrono::Utc;
use stockroom_core::{Cart, CartSnapshot, ItemId, Money};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::notify::{Notice, Outbox};
use crate::storage::{StorageArea, StorageError, keys};

/// Where the shopper returns after logging in to check out.
pub const CART_PATH: &str = "/cart";

/// Errors from cart mutations. `Display` is the text shown to the shopper.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// Client-visible cart state.
#[derive(Debug)]
pub struct CartSession {
    api: ApiClient,
    cart: Cart,
    loading: bool,
    outbox: Outbox,
}

impl CartSession {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cart: Cart::empty(),
            loading: false,
            outbox: Outbox::default(),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    pub fn notices(&mut self) -> Vec<Notice> {
        self.outbox.drain()
    }

    /// Forget the local cart without touching the backend.
    pub fn reset(&mut self) {
        self.cart = Cart::empty();
    }

    /// Load the cart, restoring a pending snapshot first if one exists.
    ///
    /// Never fails: a 401 yields an empty cart, any other failure an empty
    /// cart and an error notice.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> &Cart {
        self.loading = true;
        self.cart = self.fetch().await;
        self.loading = false;
        &self.cart
    }

    async fn fetch(&mut self) -> Cart {
        if !self.api.tokens().has_any() {
            debug!("No session, starting with an empty cart");
            return Cart::empty();
        }

        if let Some(snapshot) = self.take_snapshot() {
            match self.replay(&snapshot).await {
                Ok(cart) => {
                    info!(lines = cart.lines().len(), "Restored pending cart");
                    self.outbox.push(Notice::info("Your cart has been restored"));
                    return cart;
                }
                Err(e) => warn!(error = %e, "Failed to restore pending cart, loading server cart"),
            }
        }

        match self.api.get_cart().await {
            Ok(cart) => cart,
            Err(e) if e.is_unauthorized() => Cart::empty(),
            Err(e) => {
                warn!(error = %e, "Failed to load cart");
                self.outbox
                    .push(Notice::error(e.user_message("Failed to load cart")));
                Cart::empty()
            }
        }
    }

    /// Read and delete the pending snapshot.
    ///
    /// A corrupt snapshot is discarded together with `returnTo`.
    fn take_snapshot(&self) -> Option<CartSnapshot> {
        let storage = self.api.tokens().storage();
        let sources = [
            (StorageArea::Session, keys::CHECKOUT_CART),
            (StorageArea::Local, keys::PENDING_CART),
        ];

        let mut found = None;
        for (area, key) in sources {
            match storage.get_json::<CartSnapshot>(area, key) {
                Ok(Some(snapshot)) => {
                    found = Some(snapshot);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(?area, key, error = %e, "Discarding corrupt cart snapshot");
                    if let Err(e) = storage.remove(StorageArea::Session, keys::RETURN_TO) {
                        warn!(error = %e, "Failed to remove return path");
                    }
                    break;
                }
            }
        }

        for (area, key) in sources {
            if let Err(e) = storage.remove(area, key) {
                warn!(?area, key, error = %e, "Failed to remove cart snapshot");
            }
        }

        found.filter(|snapshot| !snapshot.is_empty())
    }

    /// Overwrite the server cart with a snapshot.
    async fn replay(&self, snapshot: &CartSnapshot) -> Result<Cart, ApiError> {
        self.api.clear_cart().await?;
        for line in snapshot.items.iter().filter(|line| line.quantity > 0) {
            self.api.add_to_cart(&line.item_id, line.quantity).await?;
        }
        self.api.get_cart().await
    }

    /// Write the current cart to the session area before a login redirect.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn save_snapshot(&self) -> Result<CartSnapshot, StorageError> {
        let storage = self.api.tokens().storage();
        let snapshot = self.cart.snapshot(Utc::now());
        storage.set_json(StorageArea::Session, keys::CHECKOUT_CART, &snapshot)?;
        storage.set(StorageArea::Session, keys::RETURN_TO, CART_PATH)?;
        debug!(lines = snapshot.items.len(), "Saved cart snapshot");
        Ok(snapshot)
    }

    /// Add units of an item.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if `quantity` is 0 or the backend refuses.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn add(&mut self, item_id: &ItemId, quantity: u32) -> Result<&Cart, CartError> {
        if quantity < 1 {
            return Err(self.reject());
        }
        self.loading = true;
        let result = self.api.add_to_cart(item_id, quantity).await;
        self.apply(result, "Item added to cart", "Failed to add item to cart")
    }

    /// Set the quantity of a line. Quantities below 1 are rejected locally.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if `quantity` is 0 or the backend refuses.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update(&mut self, item_id: &ItemId, quantity: u32) -> Result<&Cart, CartError> {
        if quantity < 1 {
            return Err(self.reject());
        }
        self.loading = true;
        let result = self.api.update_cart_item(item_id, quantity).await;
        self.apply(result, "Cart updated", "Failed to update cart")
    }

    /// # Errors
    ///
    /// Returns `CartError` if the backend refuses.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove(&mut self, item_id: &ItemId) -> Result<&Cart, CartError> {
        self.loading = true;
        let result = self.api.remove_from_cart(item_id).await;
        self.apply(result, "Item removed from cart", "Failed to remove item from cart")
    }

    /// # Errors
    ///
    /// Returns `CartError` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<&Cart, CartError> {
        self.loading = true;
        let result = self.api.clear_cart().await;
        self.apply(result, "Cart cleared", "Failed to clear cart")
    }

    /// Clear the cart after an order was accepted. Failures are logged only.
    pub(crate) async fn clear_after_order(&mut self) {
        match self.api.clear_cart().await {
            Ok(cart) => self.cart = cart,
            Err(e) => warn!(error = %e, "Order placed but the cart could not be cleared"),
        }
    }

    fn reject(&mut self) -> CartError {
        let err = CartError::InvalidQuantity;
        self.outbox.push(Notice::error(err.to_string()));
        err
    }

    fn apply(
        &mut self,
        result: Result<Cart, ApiError>,
        success: &str,
        fallback: &str,
    ) -> Result<&Cart, CartError> {
        self.loading = false;
        match result {
            Ok(cart) => {
                self.cart = cart;
                self.outbox.push(Notice::success(success));
                Ok(&self.cart)
            }
            Err(source) => {
                warn!(error = %source, "Cart update failed");
                let message = source.user_message(fallback);
                self.outbox.push(Notice::error(message.clone()));
                Err(CartError::Api { message, source })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::Storage;
    use crate::tokens::TokenStore;

    fn session(storage: &Storage) -> CartSession {
        // Nothing listens here; tests below never reach the network.
        let config = ClientConfig::new("http://127.0.0.1:9/api", "unused.json").unwrap();
        let api = ApiClient::new(&config, TokenStore::new(storage.clone())).unwrap();
        CartSession::new(api)
    }

    #[tokio::test]
    async fn test_load_without_token_is_empty_and_keeps_snapshot() {
        let storage = Storage::memory();
        storage
            .set(StorageArea::Session, keys::CHECKOUT_CART, r#"{"items":[],"total":0,"timestamp":"2026-01-01T00:00:00Z"}"#)
            .unwrap();
        let mut cart = session(&storage);

        assert!(cart.load().await.is_empty());
        assert!(!cart.is_loading());
        assert!(storage.get(StorageArea::Session, keys::CHECKOUT_CART).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_locally() {
        let storage = Storage::memory();
        let mut cart = session(&storage);
        let id = ItemId::new("i1");

        assert!(matches!(
            cart.update(&id, 0).await,
            Err(CartError::InvalidQuantity)
        ));
        assert!(matches!(cart.add(&id, 0).await, Err(CartError::InvalidQuantity)));
        let notices = cart.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "Quantity must be at least 1");
    }

    #[test]
    fn test_save_snapshot_writes_session_area() {
        let storage = Storage::memory();
        let cart = session(&storage);
        let snapshot = cart.save_snapshot().unwrap();
        assert!(snapshot.items.is_empty());

        let stored: CartSnapshot = storage
            .get_json(StorageArea::Session, keys::CHECKOUT_CART)
            .unwrap()
            .unwrap();
        assert_eq!(stored, snapshot);
        assert_eq!(
            storage.get(StorageArea::Session, keys::RETURN_TO).unwrap().as_deref(),
            Some(CART_PATH)
        );
    }

    #[test]
    fn test_corrupt_snapshot_discarded_with_return_path() {
        let storage = Storage::memory();
        storage.set(StorageArea::Session, keys::CHECKOUT_CART, "{not json").unwrap();
        storage.set(StorageArea::Local, keys::PENDING_CART, "{}").unwrap();
        storage.set(StorageArea::Session, keys::RETURN_TO, CART_PATH).unwrap();
        let cart = session(&storage);

        assert!(cart.take_snapshot().is_none());
        assert!(storage.get(StorageArea::Session, keys::CHECKOUT_CART).unwrap().is_none());
        assert!(storage.get(StorageArea::Local, keys::PENDING_CART).unwrap().is_none());
        assert!(storage.get(StorageArea::Session, keys::RETURN_TO).unwrap().is_none());
    }

    #[test]
    fn test_pending_cart_key_honoured() {
        let storage = Storage::memory();
        storage
            .set(
                StorageArea::Local,
                keys::PENDING_CART,
                r#"{"items":[{"itemId":"i1","name":"Lamp","price":25,"quantity":2}],"total":50,"timestamp":"2026-01-01T00:00:00Z"}"#,
            )
            .unwrap();
        let cart = session(&storage);

        let snapshot = cart.take_snapshot().unwrap();
        assert_eq!(snapshot.quantities().get(&ItemId::new("i1")), Some(&2));
        assert!(cart.take_snapshot().is_none());
    }
}
