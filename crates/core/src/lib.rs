//! Stockroom Core - Shared domain types.
//!
//! This crate provides the types used across all Stockroom components:
//! - `storefront` - Client library (token store, API client, sessions, checkout)
//! - `cli` - Command-line front-end for shoppers and admins
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Pricing and validation live here so they can be tested
//! without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, roles and statuses
//! - [`cart`] - Cart lines, carts and the pending-cart snapshot
//! - [`catalog`] - Inventory items
//! - [`order`] - Order drafts and server orders
//! - [`pricing`] - Tax and shipping policy
//! - [`shipping`] - Shipping details and their validation
//! - [`user`] - User profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod pricing;
pub mod shipping;
pub mod types;
pub mod user;

pub use cart::{Cart, CartAmountError, CartLineItem, CartSnapshot};
pub use catalog::{Item, ItemImage, ItemInput, ItemInputError};
pub use order::{Order, OrderAddress, OrderConfirmation, OrderDraft, OrderDraftError, OrderLine};
pub use pricing::{OrderTotals, PricingPolicy};
pub use shipping::{ShippingDetails, ShippingError, ShippingField};
pub use types::*;
pub use user::UserProfile;
