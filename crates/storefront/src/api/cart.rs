//! Cart endpoints (`/cart`).

use reqwest::Method;
use serde_json::json;
use stockroom_core::{Cart, ItemId};
use tracing::{debug, instrument, warn};

use super::wire::WireCart;
use super::{ApiClient, ApiError, Body, envelope};

impl ApiClient {
    /// Fetch the shopper's cart. A missing cart is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than 404.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart, ApiError> {
        match self.send(Method::GET, "cart", Body::Empty).await {
            Ok(body) => decode_cart(body),
            Err(ApiError::NotFound(_)) => {
                debug!("No cart on the backend yet");
                Ok(Cart::empty())
            }
            Err(e) => Err(e),
        }
    }

    /// Add units of an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn add_to_cart(&self, item_id: &ItemId, quantity: u32) -> Result<Cart, ApiError> {
        let body = json!({ "itemId": item_id, "quantity": quantity });
        let response = self
            .send(Method::POST, "cart/items", Body::Json(&body))
            .await?;
        decode_cart(response)
    }

    /// Set the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        item_id: &ItemId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let body = json!({ "quantity": quantity });
        let response = self
            .send(Method::PUT, &format!("cart/items/{item_id}"), Body::Json(&body))
            .await?;
        decode_cart(response)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: &ItemId) -> Result<Cart, ApiError> {
        let response = self
            .send(Method::DELETE, &format!("cart/items/{item_id}"), Body::Empty)
            .await?;
        decode_cart(response)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<Cart, ApiError> {
        let response = self.send(Method::DELETE, "cart", Body::Empty).await?;
        decode_cart(response)
    }
}

/// Mutation responses without a cart body mean an empty cart.
fn decode_cart(body: serde_json::Value) -> Result<Cart, ApiError> {
    if body.is_null() {
        return Ok(Cart::empty());
    }
    let wire: WireCart = envelope::decode(body, &["cart"])?;
    let cart = Cart::from(wire);
    cart.verify_amounts().map_err(|e| {
        warn!(error = %e, "Backend sent a cart with unusable amounts");
        ApiError::UnexpectedResponse(e.to_string())
    })?;
    Ok(cart)
}
