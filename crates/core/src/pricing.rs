//! Tax and shipping policy.
//!
//! ```text
//! subtotal = sum(price * quantity)
//! tax      = subtotal * tax_rate
//! shipping = 0 if subtotal > free_shipping_threshold else flat_shipping_fee
//! total    = subtotal + tax + shipping
//! ```
//!
//! Quotes are exact; call [`OrderTotals::rounded`] when building a payload or
//! rendering.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::Money;

/// Pricing knobs applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax.
    pub tax_rate: Decimal,
    /// Subtotals strictly above this ship for free.
    pub free_shipping_threshold: Money,
    /// Shipping charged at or below the threshold.
    pub flat_shipping_fee: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(15, 2),
            free_shipping_threshold: Money::from_units(100),
            flat_shipping_fee: Money::from_units(10),
        }
    }
}

impl PricingPolicy {
    /// Shipping charge for a subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold {
            Money::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Price a subtotal.
    #[must_use]
    pub fn quote(&self, subtotal: Money) -> OrderTotals {
        let tax = subtotal * self.tax_rate;
        let shipping = self.shipping_for(subtotal);
        OrderTotals {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

/// The price breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Shipping charge.
    pub shipping: Money,
    /// Everything together.
    pub total: Money,
}

impl OrderTotals {
    /// Every component rounded to cents.
    ///
    /// The total is rounded from the exact sum, not re-added from rounded
    /// parts.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: self.subtotal.rounded(),
            tax: self.tax.rounded(),
            shipping: self.shipping.rounded(),
            total: self.total.rounded(),
        }
    }

    /// Whether shipping is free for this order.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping == Money::ZERO
    }
}
