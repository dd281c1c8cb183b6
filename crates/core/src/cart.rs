//! Cart lines, carts and the pending-cart snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ItemId, Money};

/// One line of a cart.
///
/// The quantity is always at least 1. A line whose quantity would drop to 0
/// is removed from the cart instead of being stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Inventory item this line refers to.
    #[serde(alias = "id", alias = "_id")]
    pub item_id: ItemId,
    /// Item name at the time the line was read.
    #[serde(default)]
    pub name: String,
    /// Price of a single unit.
    #[serde(rename = "price")]
    pub unit_price: Money,
    /// Number of units, at least 1.
    pub quantity: u32,
    /// Image path or URL, if the item has one.
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl CartLineItem {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Amounts a cart must never carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartAmountError {
    #[error("item {0} has a negative price")]
    NegativePrice(ItemId),
    #[error("cart total is out of range")]
    OutOfRange,
}

/// A shopping cart.
///
/// Lines keep their insertion order, which is also the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from lines, dropping any zero-quantity line.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLineItem>) -> Self {
        Self {
            lines: lines.into_iter().filter(|line| line.quantity > 0).collect(),
        }
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up the line for an item.
    #[must_use]
    pub fn line(&self, item_id: &ItemId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| &line.item_id == item_id)
    }

    /// Sum of `unit_price * quantity` over all lines, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// The subtotal, or `None` when it does not fit a `Decimal`.
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::ZERO, |acc, line| {
            acc.checked_add(line.unit_price.checked_mul(line.quantity)?)
        })
    }

    /// Check that prices are non-negative and the totals stay in range.
    ///
    /// The subtotal must fit twice over so tax and shipping can be added.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn verify_amounts(&self) -> Result<(), CartAmountError> {
        if let Some(line) = self.lines.iter().find(|line| line.unit_price.is_negative()) {
            return Err(CartAmountError::NegativePrice(line.item_id.clone()));
        }
        self.checked_subtotal()
            .and_then(|subtotal| subtotal.checked_mul(2))
            .map(|_| ())
            .ok_or(CartAmountError::OutOfRange)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Capture the cart so it can survive a login redirect.
    #[must_use]
    pub fn snapshot(&self, taken_at: DateTime<Utc>) -> CartSnapshot {
        CartSnapshot {
            items: self.lines.clone(),
            total: self.subtotal(),
            timestamp: taken_at,
        }
    }
}

/// A cart saved before redirecting an anonymous shopper to login.
///
/// Written once when checkout is attempted without a session, consumed once
/// right after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines as they were when the snapshot was taken.
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    /// Cart subtotal at snapshot time.
    #[serde(default)]
    pub total: Money,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

impl CartSnapshot {
    /// Whether there is anything worth restoring.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|line| line.quantity == 0)
    }

    /// Item/quantity pairs, independent of line order.
    #[must_use]
    pub fn quantities(&self) -> BTreeMap<ItemId, u32> {
        quantities(&self.items)
    }
}

/// Item/quantity pairs of a set of lines, independent of order.
#[must_use]
pub fn quantities(lines: &[CartLineItem]) -> BTreeMap<ItemId, u32> {
    let mut map = BTreeMap::new();
    for line in lines {
        let count = map.entry(line.item_id.clone()).or_insert(0_u32);
        *count = count.saturating_add(line.quantity);
    }
    map
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn line(id: &str, cents: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            item_id: ItemId::new(id),
            name: format!("Item {id}"),
            unit_price: Money::from_cents(cents),
            quantity,
            image_ref: None,
        }
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let cart = Cart::from_lines([line("a", 5000, 2), line("b", 1999, 3)]);
        assert_eq!(cart.subtotal(), Money::from_cents(10_000 + 5997));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_subtotal_is_deterministic() {
        let cart = Cart::from_lines([line("a", 333, 3), line("b", 1, 7), line("c", 12_345, 1)]);
        assert_eq!(cart.subtotal(), cart.subtotal());
        assert_eq!(cart.clone().subtotal(), cart.subtotal());
    }

    #[test]
    fn test_verify_amounts() {
        let cart = Cart::from_lines([line("a", 5000, 2)]);
        assert_eq!(cart.verify_amounts(), Ok(()));

        let negative = Cart::from_lines([line("a", 5000, 1), line("b", -1, 1)]);
        assert_eq!(
            negative.verify_amounts(),
            Err(CartAmountError::NegativePrice(ItemId::new("b")))
        );
    }

    #[test]
    fn test_out_of_range_cart_is_rejected_without_panicking() {
        let huge: Money = serde_json::from_str("\"70000000000000000000000000000\"").unwrap();
        let mut lamp = line("a", 0, 2);
        lamp.unit_price = huge;
        let cart = Cart::from_lines([lamp]);

        assert_eq!(cart.checked_subtotal(), None);
        assert_eq!(cart.verify_amounts(), Err(CartAmountError::OutOfRange));
        // Saturates instead of panicking
        let _ = cart.subtotal();
    }

    #[test]
    fn test_zero_quantity_lines_are_dropped() {
        let cart = Cart::from_lines([line("a", 100, 0), line("b", 100, 1)]);
        assert_eq!(cart.lines().len(), 1);
        assert!(cart.line(&ItemId::new("a")).is_none());
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::empty();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_snapshot_preserves_lines() {
        let cart = Cart::from_lines([line("a", 5000, 2), line("b", 250, 1)]);
        let snapshot = cart.snapshot(Utc::now());
        assert_eq!(snapshot.items, cart.lines());
        assert_eq!(snapshot.total, Money::from_cents(10_250));
        assert_eq!(snapshot.quantities(), quantities(cart.lines()));
    }

    #[test]
    fn test_snapshot_json_accepts_legacy_id_key() {
        let json = r#"{
            "items": [{"_id": "x1", "name": "Lamp", "price": 12.5, "quantity": 2}],
            "total": 25,
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;
        let snapshot: CartSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.items[0].item_id.as_str(), "x1");
        assert_eq!(snapshot.items[0].line_total(), Money::from_units(25));
    }
}
