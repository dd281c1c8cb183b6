//! Stockroom storefront client library.
//!
//! Talks to the shop backend and keeps the client-side state a browser
//! storefront would: auth tokens, the current session, the cart and the
//! checkout flow.
//!
//! # Layers
//!
//! - [`storage`] / [`tokens`] - cookie, local and session areas and the
//!   tokens kept in them
//! - [`api`] - HTTP client for the backend REST API
//! - [`services`] - auth session, cart session, checkout flow
//! - [`guards`] - access checks for protected views
//! - [`state`] - [`AppContext`] owning all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod guards;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;
pub mod tokens;

pub use error::AppError;
pub use state::AppContext;
