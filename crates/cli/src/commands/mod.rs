//! Subcommand implementations.
//!
//! Each module maps one group of subcommands onto [`AppContext`]
//! operations and prints the result.
//!
//! [`AppContext`]: stockroom_storefront::AppContext

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod items;
pub mod orders;

use stockroom_storefront::AppError;
use stockroom_storefront::api::ApiError;
use stockroom_storefront::config::ConfigError;
use stockroom_storefront::services::{CartError, CheckoutError};
use stockroom_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Text to print for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::App(e.into())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::App(e.into())
    }
}

impl From<CartError> for CliError {
    fn from(e: CartError) -> Self {
        Self::App(e.into())
    }
}

impl From<CheckoutError> for CliError {
    fn from(e: CheckoutError) -> Self {
        Self::App(e.into())
    }
}
