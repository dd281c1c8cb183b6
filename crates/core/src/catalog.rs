//! Inventory items and the admin form used to create or edit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::{ItemId, Money};

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "General";

/// Largest image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image content types accepted for upload.
pub const IMAGE_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(alias = "_id")]
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Money,
    /// Units in stock.
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Backends send either one path or a list of paths; only the first is kept.
    #[serde(
        default,
        deserialize_with = "first_image",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Whether any units are left.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Category for display.
    #[must_use]
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

fn first_image<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        match Option::<OneOrMany>::deserialize(deserializer)? {
            Some(OneOrMany::One(path)) => Some(path),
            Some(OneOrMany::Many(paths)) => paths.into_iter().next(),
            None => None,
        }
        .filter(|path| !path.is_empty()),
    )
}

/// An image file attached to an item form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A field-scoped problem with an item form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemInputError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Price must be greater than 0")]
    PriceNotPositive,
    #[error("Only JPG, JPEG, and PNG files are allowed")]
    ImageType,
    #[error("Image size must be less than 5MB")]
    ImageTooLarge,
}

/// Admin form for creating or replacing an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub quantity: u32,
    pub price: Money,
    pub category: Option<String>,
    pub image: Option<ItemImage>,
}

impl ItemInput {
    /// Check the form before it is sent.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, checking name, price, then image.
    pub fn validate(&self) -> Result<(), ItemInputError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ItemInputError::NameRequired);
        }
        if name.chars().count() < 2 {
            return Err(ItemInputError::NameTooShort);
        }
        if self.price <= Money::ZERO {
            return Err(ItemInputError::PriceNotPositive);
        }
        if let Some(image) = &self.image {
            if !IMAGE_CONTENT_TYPES.contains(&image.content_type.as_str()) {
                return Err(ItemInputError::ImageType);
            }
            if image.bytes.len() > MAX_IMAGE_BYTES {
                return Err(ItemInputError::ImageTooLarge);
            }
        }
        Ok(())
    }

    /// Text fields as sent in a JSON body or as multipart parts.
    ///
    /// Blank optional fields are left out; the category falls back to
    /// [`DEFAULT_CATEGORY`].
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("name", self.name.trim().to_owned())];
        if let Some(sku) = self.sku.as_deref().filter(|s| !s.trim().is_empty()) {
            fields.push(("sku", sku.trim().to_owned()));
        }
        if let Some(description) = self.description.as_deref().filter(|s| !s.trim().is_empty()) {
            fields.push(("description", description.to_owned()));
        }
        fields.push(("quantity", self.quantity.to_string()));
        fields.push(("price", self.price.rounded().amount().to_string()));
        fields.push((
            "category",
            self.category
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_CATEGORY)
                .to_owned(),
        ));
        fields
    }

    /// JSON body for requests without an image.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        for (key, value) in self.fields() {
            let value = match key {
                "quantity" => serde_json::Value::from(self.quantity),
                "price" => serde_json::to_value(self.price.rounded())
                    .unwrap_or(serde_json::Value::String(value)),
                _ => serde_json::Value::String(value),
            };
            body.insert(key.to_owned(), value);
        }
        serde_json::Value::Object(body)
    }
}
