//! Unified error handling.
//!
//! Each concern has its own error type; `AppError` wraps them so front-ends
//! can use one `Result` type and `?` across sessions.

use stockroom_core::ItemInputError;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::{AuthError, CartError, CheckoutError};
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Client storage could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Login, registration or logout failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A cart mutation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A checkout step failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// An admin item form is invalid.
    #[error(transparent)]
    ItemInput(#[from] ItemInputError),

    /// A route guard refused access.
    #[error("{0}")]
    Denied(String),
}

impl AppError {
    /// Text to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message("Something went wrong. Please try again."),
            other => other.to_string(),
        }
    }
}
