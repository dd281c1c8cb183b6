//! Inventory endpoints (`/items`).

use std::sync::Arc;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use stockroom_core::{Item, ItemId, ItemInput};
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError, Body, envelope};

/// Multipart body for an item form with an image attached.
pub(super) fn multipart_form(input: &ItemInput) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (key, value) in input.fields() {
        form = form.text(key, value);
    }
    if let Some(image) = &input.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part("image", part);
    }
    Ok(form)
}

impl ApiClient {
    /// List every inventory item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&CacheKey::Items).await {
            debug!("Cache hit for item list");
            return Ok(items.as_ref().clone());
        }

        let body = self.send(Method::GET, "items", Body::Empty).await?;
        let items: Vec<Item> = envelope::decode(body, &["items"])?;

        self.inner
            .cache
            .insert(CacheKey::Items, CacheValue::Items(Arc::new(items.clone())))
            .await;
        Ok(items)
    }

    /// Fetch one item.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the item does not exist.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn get_item(&self, id: &ItemId) -> Result<Item, ApiError> {
        let key = CacheKey::Item(id.clone());
        if let Some(CacheValue::Item(item)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for item");
            return Ok(*item);
        }

        let body = self
            .send(Method::GET, &format!("items/{id}"), Body::Empty)
            .await?;
        let item: Item = envelope::decode(body, &["item"])?;

        self.inner
            .cache
            .insert(key, CacheValue::Item(Box::new(item.clone())))
            .await;
        Ok(item)
    }

    /// Create an item (admin). Sent as multipart when an image is attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_item(&self, input: &ItemInput) -> Result<Item, ApiError> {
        let body = self.send(Method::POST, "items", Body::Item(input)).await?;
        self.invalidate_items();
        envelope::decode(body, &["item"])
    }

    /// Replace an item (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, input), fields(item_id = %id))]
    pub async fn update_item(&self, id: &ItemId, input: &ItemInput) -> Result<Item, ApiError> {
        let body = self
            .send(Method::PUT, &format!("items/{id}"), Body::Item(input))
            .await?;
        self.invalidate_items();
        envelope::decode(body, &["item"])
    }

    /// Delete an item (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn delete_item(&self, id: &ItemId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("items/{id}"), Body::Empty)
            .await?;
        self.invalidate_items();
        Ok(())
    }

    /// Drop every cached inventory response.
    pub fn invalidate_items(&self) {
        self.inner.cache.invalidate_all();
    }
}
