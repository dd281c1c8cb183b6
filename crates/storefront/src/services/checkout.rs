//! Checkout flow.
//!
//! A state machine layered on [`CartSession`]:
//!
//! ```text
//! Cart --place_order--> Shipping --submit_shipping--> Review --confirm_order--> Success
//!   ^                      |                             |
//!   +--------back----------+<-----------back-------------+
//! ```
//!
//! Failed transitions leave the state where it was and produce exactly one
//! notice. `Success` is terminal.

use std::fmt;

use stockroom_core::{
    Cart, OrderConfirmation, OrderDraft, OrderDraftError, OrderTotals, PricingPolicy,
    ShippingDetails, ShippingError,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::cart::{CART_PATH, CartSession};
use crate::api::{ApiClient, ApiError};
use crate::notify::{Notice, Outbox};
use crate::storage::StorageError;

const LOGIN_TO_ORDER: &str = "Please log in to complete your order";
const ORDER_FAILED: &str = "Failed to place order. Please try again.";
const ORDER_PLACED: &str = "Order placed successfully!";

/// Where the shopper is in checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Cart,
    Shipping,
    Review,
    Success(OrderConfirmation),
}

impl CheckoutState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Shipping => "shipping",
            Self::Review => "review",
            Self::Success(_) => "success",
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of asking to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOrder {
    /// Now collecting shipping details.
    Shipping,
    /// No session. The cart was saved; log in and come back to `return_to`.
    LoginRequired {
        return_to: &'static str,
        message: &'static str,
    },
}

/// Errors from checkout transitions. `Display` is the text shown to the
/// shopper.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("cannot {action} from the {from} step")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error(transparent)]
    Shipping(#[from] ShippingError),

    #[error(transparent)]
    Draft(#[from] OrderDraftError),

    #[error("{message}")]
    Order {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to save cart: {0}")]
    Storage(#[from] StorageError),
}

/// Drives one checkout from cart to confirmation.
#[derive(Debug)]
pub struct CheckoutFlow {
    api: ApiClient,
    pricing: PricingPolicy,
    state: CheckoutState,
    shipping: ShippingDetails,
    outbox: Outbox,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(api: ApiClient, pricing: PricingPolicy) -> Self {
        Self {
            api,
            pricing,
            state: CheckoutState::Cart,
            shipping: ShippingDetails::default(),
            outbox: Outbox::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Shipping details as last submitted.
    #[must_use]
    pub const fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    /// The order confirmation, once the flow has succeeded.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        match &self.state {
            CheckoutState::Success(confirmation) => Some(confirmation),
            _ => None,
        }
    }

    /// Rounded totals for a cart under this flow's pricing.
    #[must_use]
    pub fn totals(&self, cart: &Cart) -> OrderTotals {
        self.pricing.quote(cart.subtotal()).rounded()
    }

    pub fn notices(&mut self) -> Vec<Notice> {
        self.outbox.drain()
    }

    /// `Cart -> Shipping`.
    ///
    /// Without a stored token the cart is snapshotted to the session area and
    /// [`PlaceOrder::LoginRequired`] is returned; the state does not change.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the cart is empty, the flow is not at the
    /// cart step, or the snapshot cannot be written.
    #[instrument(skip_all, fields(state = %self.state))]
    pub fn place_order(&mut self, cart: &CartSession) -> Result<PlaceOrder, CheckoutError> {
        self.require_step(&CheckoutState::Cart, "place an order")?;
        if cart.cart().is_empty() {
            return Err(self.fail(CheckoutError::EmptyCart));
        }

        if !self.api.tokens().has_any() {
            if let Err(e) = cart.save_snapshot() {
                return Err(self.fail(e.into()));
            }
            info!("Checkout needs a login, cart saved");
            self.outbox.push(Notice::info(LOGIN_TO_ORDER));
            return Ok(PlaceOrder::LoginRequired {
                return_to: CART_PATH,
                message: LOGIN_TO_ORDER,
            });
        }

        self.state = CheckoutState::Shipping;
        Ok(PlaceOrder::Shipping)
    }

    /// `Shipping -> Review`, after validating every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field, or `InvalidTransition` outside the
    /// shipping step.
    #[instrument(skip_all, fields(state = %self.state))]
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<(), CheckoutError> {
        self.require_step(&CheckoutState::Shipping, "submit shipping details")?;
        if let Err(e) = details.validate() {
            return Err(self.fail(e.into()));
        }
        self.shipping = details;
        self.state = CheckoutState::Review;
        Ok(())
    }

    /// `Review -> Success`: submit the order.
    ///
    /// Clearing the cart afterwards is best effort and never undoes success.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the draft cannot be built or the backend
    /// rejects the order. The flow stays at review.
    #[instrument(skip_all, fields(state = %self.state))]
    pub async fn confirm_order(
        &mut self,
        cart: &mut CartSession,
    ) -> Result<OrderConfirmation, CheckoutError> {
        self.require_step(&CheckoutState::Review, "confirm the order")?;

        let draft = match OrderDraft::build(cart.cart(), &self.shipping, &self.pricing) {
            Ok(draft) => draft,
            Err(e) => return Err(self.fail(e.into())),
        };

        let order = match self.api.create_order(&draft).await {
            Ok(order) => order,
            Err(source) => {
                let message = source.user_message(ORDER_FAILED);
                return Err(self.fail(CheckoutError::Order { message, source }));
            }
        };

        let confirmation = OrderConfirmation::new(&order, &draft, cart.cart());
        info!(
            order_id = %confirmation.order_id,
            total = %confirmation.total,
            "Order placed"
        );
        cart.clear_after_order().await;

        self.outbox.push(Notice::success(ORDER_PLACED));
        self.state = CheckoutState::Success(confirmation.clone());
        Ok(confirmation)
    }

    /// `Shipping -> Cart` or `Review -> Shipping`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from the cart and success steps.
    pub fn back(&mut self) -> Result<&CheckoutState, CheckoutError> {
        let previous = match &self.state {
            CheckoutState::Shipping => Some(CheckoutState::Cart),
            CheckoutState::Review => Some(CheckoutState::Shipping),
            CheckoutState::Cart | CheckoutState::Success(_) => None,
        };
        let Some(previous) = previous else {
            return Err(self.invalid("go back"));
        };
        self.state = previous;
        Ok(&self.state)
    }

    fn require_step(&mut self, step: &CheckoutState, action: &'static str) -> Result<(), CheckoutError> {
        if std::mem::discriminant(&self.state) == std::mem::discriminant(step) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&mut self, action: &'static str) -> CheckoutError {
        self.fail(CheckoutError::InvalidTransition {
            from: self.state.name(),
            action,
        })
    }

    fn fail(&mut self, err: CheckoutError) -> CheckoutError {
        warn!(state = %self.state, error = %err, "Checkout step failed");
        self.outbox.push(Notice::error(err.to_string()));
        err
    }
}
