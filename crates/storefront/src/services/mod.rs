//! Client-side sessions.
//!
//! # Services
//!
//! - `auth` - Who is logged in (login, register, logout, startup restore)
//! - `cart` - The shopper's cart and the pending-cart snapshot
//! - `checkout` - Cart -> shipping -> review -> success state machine
//!
//! Each session owns an outbox of [`Notice`](crate::notify::Notice)s and is
//! driven through `&mut self`, one operation at a time.

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthSession, Session};
pub use cart::{CartError, CartSession};
pub use checkout::{CheckoutError, CheckoutFlow, CheckoutState, PlaceOrder};
