//! Order drafts, server orders and the confirmation shown after checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartLineItem};
use crate::pricing::{OrderTotals, PricingPolicy};
use crate::shipping::ShippingDetails;
use crate::types::{ItemId, Money, OrderId, OrderStatus};

/// Payment method sent with every order.
pub const PAYMENT_METHOD: &str = "Credit Card";

/// Why a draft could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderDraftError {
    #[error("Your cart is empty")]
    EmptyCart,
    /// Payload keys of the blank fields, in payload check order.
    #[error("Missing required shipping fields: {}", .0.join(", "))]
    MissingShippingFields(Vec<&'static str>),
}

/// One line of an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraftLine {
    pub item: ItemId,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
    pub image_url: String,
}

impl From<&CartLineItem> for OrderDraftLine {
    fn from(line: &CartLineItem) -> Self {
        Self {
            item: line.item_id.clone(),
            name: if line.name.is_empty() {
                "Unknown Item".to_owned()
            } else {
                line.name.clone()
            },
            quantity: line.quantity.max(1),
            price: line.unit_price,
            image_url: line.image_ref.clone().unwrap_or_default(),
        }
    }
}

/// Shipping block of an order request.
///
/// Carries the trimmed shipping fields plus the `fullName` and `zipCode`
/// aliases some backends expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub email: String,
    pub full_name: String,
    pub state: String,
    pub zip_code: String,
}

impl DraftAddress {
    /// Payload keys checked before submitting, in check order.
    const REQUIRED: [&'static str; 7] = [
        "firstName",
        "lastName",
        "address",
        "city",
        "postalCode",
        "country",
        "email",
    ];

    fn value(&self, key: &str) -> &str {
        match key {
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "address" => &self.address,
            "city" => &self.city,
            "postalCode" => &self.postal_code,
            "country" => &self.country,
            "email" => &self.email,
            _ => "",
        }
    }

    /// Required payload keys whose value is blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        Self::REQUIRED
            .into_iter()
            .filter(|key| self.value(key).trim().is_empty())
            .collect()
    }
}

impl From<&ShippingDetails> for DraftAddress {
    fn from(details: &ShippingDetails) -> Self {
        let details = details.trimmed();
        Self {
            full_name: details.full_name(),
            zip_code: details.postal_code.clone(),
            state: details.state.unwrap_or_default(),
            phone: details.phone.unwrap_or_default(),
            first_name: details.first_name,
            last_name: details.last_name,
            address: details.address,
            city: details.city,
            postal_code: details.postal_code,
            country: details.country,
            email: details.email,
        }
    }
}

/// The request body for `POST /orders`.
///
/// Built at submission time and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub order_items: Vec<OrderDraftLine>,
    pub shipping_address: DraftAddress,
    pub payment_method: &'static str,
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
    pub email: String,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
}

impl OrderDraft {
    /// Price the cart and assemble the order request.
    ///
    /// Prices are rounded to cents here and nowhere earlier.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDraftError::EmptyCart`] for an empty cart, or
    /// [`OrderDraftError::MissingShippingFields`] when a required field of the
    /// trimmed address is blank.
    pub fn build(
        cart: &Cart,
        shipping: &ShippingDetails,
        policy: &PricingPolicy,
    ) -> Result<Self, OrderDraftError> {
        if cart.is_empty() {
            return Err(OrderDraftError::EmptyCart);
        }

        let shipping_address = DraftAddress::from(shipping);
        let missing = shipping_address.missing_fields();
        if !missing.is_empty() {
            return Err(OrderDraftError::MissingShippingFields(missing));
        }

        let totals = policy.quote(cart.subtotal()).rounded();
        Ok(Self {
            order_items: cart.lines().iter().map(OrderDraftLine::from).collect(),
            email: shipping_address.email.clone(),
            shipping_address,
            payment_method: PAYMENT_METHOD,
            items_price: totals.subtotal,
            shipping_price: totals.shipping,
            tax_price: totals.tax,
            total_price: totals.total,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            status: OrderStatus::Pending,
        })
    }

    /// The rounded totals carried by this draft.
    #[must_use]
    pub const fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.items_price,
            tax: self.tax_price,
            shipping: self.shipping_price,
            total: self.total_price,
        }
    }
}

/// One line of a server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default)]
    pub item: Option<ItemId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Shipping address as echoed back by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderAddress {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Older backends send only this key; ours sends both.
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
}

impl OrderAddress {
    /// `postalCode`, falling back to `zipCode`.
    #[must_use]
    pub fn postal(&self) -> Option<&str> {
        self.postal_code
            .as_deref()
            .or(self.zip_code.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Best display name available.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return full.trim().to_owned();
        }
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An order as stored by the backend.
///
/// Fields the backend may omit default rather than fail the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, alias = "items")]
    pub order_items: Vec<OrderLine>,
    #[serde(default)]
    pub shipping_address: OrderAddress,
    #[serde(default)]
    pub items_price: Money,
    #[serde(default)]
    pub tax_price: Money,
    #[serde(default)]
    pub shipping_price: Money,
    #[serde(default)]
    pub total_price: Money,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Order number for display, falling back to the id.
    #[must_use]
    pub fn display_number(&self) -> &str {
        self.order_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// What the shopper sees once an order has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub order_number: String,
    pub total: Money,
    pub email: String,
    pub items: Vec<CartLineItem>,
}

impl OrderConfirmation {
    /// Combine the accepted order with the draft and cart it came from.
    #[must_use]
    pub fn new(order: &Order, draft: &OrderDraft, cart: &Cart) -> Self {
        Self {
            order_id: order.id.clone(),
            order_number: order.display_number().to_owned(),
            total: draft.total_price,
            email: draft.email.clone(),
            items: cart.lines().to_vec(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::tests::line;
    use crate::shipping::tests::complete;

    fn sample_cart() -> Cart {
        Cart::from_lines([line("a", 6000, 2)])
    }

    #[test]
    fn test_build_prices_and_rounds() {
        let draft =
            OrderDraft::build(&sample_cart(), &complete(), &PricingPolicy::default()).unwrap();
        assert_eq!(draft.items_price, Money::from_units(120));
        assert_eq!(draft.tax_price, Money::from_units(18));
        assert_eq!(draft.shipping_price, Money::ZERO);
        assert_eq!(draft.total_price, Money::from_units(138));
        assert_eq!(draft.status, OrderStatus::Pending);
        assert_eq!(draft.payment_method, "Credit Card");
    }

    #[test]
    fn test_payload_shape() {
        let mut shipping = complete();
        shipping.first_name = "  Ada ".to_string();
        let draft = OrderDraft::build(&sample_cart(), &shipping, &PricingPolicy::default()).unwrap();
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["orderItems"][0]["item"], "a");
        assert_eq!(json["orderItems"][0]["quantity"], 2);
        assert_eq!(json["orderItems"][0]["price"], 60.0);
        assert_eq!(json["orderItems"][0]["imageUrl"], "");
        assert_eq!(json["shippingAddress"]["firstName"], "Ada");
        assert_eq!(json["shippingAddress"]["fullName"], "Ada Lovelace");
        assert_eq!(json["shippingAddress"]["zipCode"], "N1 9GU");
        assert_eq!(json["shippingAddress"]["state"], "");
        assert_eq!(json["paymentMethod"], "Credit Card");
        assert_eq!(json["totalPrice"], 138.0);
        assert_eq!(json["isPaid"], false);
        assert!(json["paidAt"].is_null());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_build_rejects_empty_cart() {
        let err =
            OrderDraft::build(&Cart::empty(), &complete(), &PricingPolicy::default()).unwrap_err();
        assert_eq!(err, OrderDraftError::EmptyCart);
        assert_eq!(err.to_string(), "Your cart is empty");
    }

    #[test]
    fn test_build_reports_all_missing_fields() {
        let mut shipping = complete();
        shipping.city = " ".to_string();
        shipping.email = String::new();
        let err = OrderDraft::build(&sample_cart(), &shipping, &PricingPolicy::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required shipping fields: city, email"
        );
    }

    #[test]
    fn test_order_tolerates_sparse_response() {
        let order: Order = serde_json::from_str(r#"{"_id":"o1","totalPrice":"138.00"}"#).unwrap();
        assert_eq!(order.id.as_str(), "o1");
        assert_eq!(order.total_price, Money::from_units(138));
        assert_eq!(order.display_number(), "o1");
        assert!(order.order_items.is_empty());
    }

    #[test]
    fn test_confirmation_prefers_order_number() {
        let cart = sample_cart();
        let draft = OrderDraft::build(&cart, &complete(), &PricingPolicy::default()).unwrap();
        let order: Order =
            serde_json::from_str(r#"{"id":"o2","orderNumber":"SR-1001","status":"pending"}"#)
                .unwrap();
        let confirmation = OrderConfirmation::new(&order, &draft, &cart);
        assert_eq!(confirmation.order_number, "SR-1001");
        assert_eq!(confirmation.total, Money::from_units(138));
        assert_eq!(confirmation.items, cart.lines());
    }

    #[test]
    fn test_order_echoing_both_postal_keys_decodes() {
        let order: Order = serde_json::from_str(
            r#"{"_id":"o1","shippingAddress":{"postalCode":"N1 9GU","zipCode":"N1 9GU"}}"#,
        )
        .unwrap();
        assert_eq!(order.shipping_address.postal(), Some("N1 9GU"));

        let legacy: Order =
            serde_json::from_str(r#"{"_id":"o2","shippingAddress":{"zipCode":"SW1Y 4JH"}}"#)
                .unwrap();
        assert_eq!(legacy.shipping_address.postal(), Some("SW1Y 4JH"));
    }

    #[test]
    fn test_draft_payload_decodes_as_order_address() {
        let draft = OrderDraft::build(&sample_cart(), &complete(), &PricingPolicy::default()).unwrap();
        let mut echoed = serde_json::to_value(&draft).unwrap();
        echoed["_id"] = serde_json::json!("o3");
        let order: Order = serde_json::from_value(echoed).unwrap();
        assert_eq!(order.shipping_address.display_name(), "Ada Lovelace");
        assert_eq!(order.order_items.len(), draft.order_items.len());
    }

    #[test]
    fn test_address_display_name() {
        let address = OrderAddress {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            ..OrderAddress::default()
        };
        assert_eq!(address.display_name(), "Ada Lovelace");
    }
}
