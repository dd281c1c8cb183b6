//! Wire shapes that need converting before they reach the domain types.
//!
//! Cart lines come back either populated (`{ item: { _id, name, price } }`)
//! or flat (`{ itemId, name, price }`); auth responses carry the token next
//! to the profile.

use serde::Deserialize;
use serde_json::Value;
use stockroom_core::{Cart, CartLineItem, ItemId, Money, UserProfile};
use tracing::warn;

/// A cart as returned by `/cart` endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct WireCart {
    #[serde(default)]
    pub items: Vec<WireCartLine>,
}

/// A populated item reference inside a cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItemRef {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<Money>,
    pub image_url: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireItem {
    Id(String),
    Populated(WireItemRef),
}

/// One cart line in either shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartLine {
    #[serde(default)]
    pub item: Option<WireItem>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<Value>,
}

/// First usable string of a single path or a list of paths.
fn image_ref(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => values.iter().find_map(|v| v.as_str().map(String::from)),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

impl WireCartLine {
    /// Convert to a domain line. Lines without an item id are dropped.
    fn into_line(self) -> Option<CartLineItem> {
        let populated = match &self.item {
            Some(WireItem::Populated(item)) => Some(item),
            _ => None,
        };
        let item_id = match &self.item {
            Some(WireItem::Id(id)) => Some(id.clone()),
            Some(WireItem::Populated(item)) => item.id.clone(),
            None => None,
        }
        .or_else(|| self.item_id.clone())
        .or_else(|| self.id.clone())?;

        Some(CartLineItem {
            item_id: ItemId::new(item_id),
            name: populated
                .and_then(|item| item.name.clone())
                .or_else(|| self.name.clone())
                .unwrap_or_default(),
            unit_price: self
                .price
                .or_else(|| populated.and_then(|item| item.price))
                .unwrap_or(Money::ZERO),
            quantity: self.quantity,
            image_ref: image_ref(populated.and_then(|item| item.image_url.as_ref()))
                .or_else(|| image_ref(self.image_url.as_ref())),
        })
    }
}

impl From<WireCart> for Cart {
    fn from(wire: WireCart) -> Self {
        Self::from_lines(wire.items.into_iter().filter_map(|line| {
            let line = line.into_line();
            if line.is_none() {
                warn!("Dropping cart line without an item id");
            }
            line
        }))
    }
}

/// Response of `/auth/login`, `/auth/register` and `/auth/refresh-token`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "refresh_token")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_populated_and_flat_lines() {
        let wire: WireCart = serde_json::from_value(json!({
            "items": [
                {"item": {"_id": "i1", "name": "Lamp", "price": 25, "imageUrl": ["/uploads/l.png"]}, "quantity": 2},
                {"itemId": "i2", "name": "Mug", "price": "4.50", "quantity": 1},
                {"item": "i3", "price": 1, "quantity": 3}
            ],
            "total": 57.5
        }))
        .unwrap();
        let cart = Cart::from(wire);

        assert_eq!(cart.lines().len(), 3);
        let lamp = cart.line(&ItemId::new("i1")).unwrap();
        assert_eq!(lamp.name, "Lamp");
        assert_eq!(lamp.unit_price, Money::from_units(25));
        assert_eq!(lamp.image_ref.as_deref(), Some("/uploads/l.png"));
        assert_eq!(cart.line(&ItemId::new("i2")).unwrap().unit_price, Money::from_cents(450));
        assert_eq!(cart.line(&ItemId::new("i3")).unwrap().quantity, 3);
        assert_eq!(cart.subtotal(), Money::from_cents(5000 + 450 + 300));
    }

    #[test]
    fn test_line_price_wins_over_item_price() {
        let wire: WireCart = serde_json::from_value(json!({
            "items": [{"item": {"_id": "i1", "price": 30}, "price": 25, "quantity": 1}]
        }))
        .unwrap();
        assert_eq!(Cart::from(wire).subtotal(), Money::from_units(25));
    }

    #[test]
    fn test_lines_without_id_or_quantity_dropped() {
        let wire: WireCart = serde_json::from_value(json!({
            "items": [{"name": "ghost", "quantity": 1}, {"itemId": "i1", "quantity": 0}]
        }))
        .unwrap();
        assert!(Cart::from(wire).is_empty());
    }

    #[test]
    fn test_auth_response() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "token": "t", "refreshToken": "r", "user": {"id": "u1", "role": "admin"}
        }))
        .unwrap();
        assert_eq!(auth.token.as_deref(), Some("t"));
        assert_eq!(auth.refresh_token.as_deref(), Some("r"));
        assert!(auth.user.unwrap().is_admin());
    }
}
