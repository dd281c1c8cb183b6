//! Order endpoints (`/orders`).

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};
use stockroom_core::{Order, OrderDraft, OrderId, OrderStatus};
use tracing::instrument;

use super::{ApiClient, ApiError, Body, envelope};

/// An admin status change.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: OrderStatus,
    /// Why an order was cancelled or refunded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Payment details recorded when marking an order paid.
    #[serde(skip)]
    pub payment_result: Option<Value>,
}

impl StatusUpdate {
    #[must_use]
    pub const fn new(status: OrderStatus) -> Self {
        Self {
            status,
            reason: None,
            payment_result: None,
        }
    }
}

impl ApiClient {
    /// Submit an order.
    ///
    /// Accepts `{ data: order }`, `{ order }` or a bare order; a body without
    /// an order id is [`ApiError::UnexpectedResponse`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no order comes back.
    #[instrument(skip(self, draft), fields(total = %draft.total_price, lines = draft.order_items.len()))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order, ApiError> {
        let payload = serde_json::to_value(draft)?;
        let body = self
            .send(Method::POST, "orders", Body::Json(&payload))
            .await?;
        envelope::decode(body, &["order"])
    }

    /// Orders placed by the logged-in shopper.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let body = self
            .send(Method::GET, "orders/myorders", Body::Empty)
            .await?;
        envelope::decode(body, &["orders"])
    }

    /// Every order (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let body = self.send(Method::GET, "orders", Body::Empty).await?;
        envelope::decode(body, &["orders"])
    }

    /// One order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let body = self
            .send(Method::GET, &format!("orders/{id}"), Body::Empty)
            .await?;
        envelope::decode(body, &["order"])
    }

    /// Change an order's status (admin).
    ///
    /// `delivered` and `paid` go through their dedicated endpoints first
    /// (`/deliver`, `/pay`) and are then written to `/status` as well.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    #[instrument(skip(self, update), fields(order_id = %id, status = %update.status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<Order, ApiError> {
        match update.status {
            OrderStatus::Delivered => {
                self.mark_delivered(id).await?;
            }
            OrderStatus::Paid => {
                self.mark_paid(id, update.payment_result.as_ref()).await?;
            }
            _ => {}
        }

        let payload = serde_json::to_value(update)?;
        let body = self
            .send(Method::PUT, &format!("orders/{id}/status"), Body::Json(&payload))
            .await?;
        envelope::decode(body, &["order"])
    }

    /// Record payment (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, payment_result), fields(order_id = %id))]
    pub async fn mark_paid(
        &self,
        id: &OrderId,
        payment_result: Option<&Value>,
    ) -> Result<Order, ApiError> {
        let payload = payment_result.cloned().unwrap_or_else(|| json!({}));
        let body = self
            .send(Method::PUT, &format!("orders/{id}/pay"), Body::Json(&payload))
            .await?;
        envelope::decode(body, &["order"])
    }

    /// Record delivery (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn mark_delivered(&self, id: &OrderId) -> Result<Order, ApiError> {
        let body = self
            .send(Method::PUT, &format!("orders/{id}/deliver"), Body::Empty)
            .await?;
        envelope::decode(body, &["order"])
    }
}
