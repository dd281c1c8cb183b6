//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors that can occur during login, registration or logout.
///
/// `Display` is the text shown to the shopper.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend accepted the credentials but sent no token.
    #[error("{0}")]
    MissingToken(&'static str),

    /// The backend rejected the request.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The token could not be persisted.
    #[error("failed to store credentials: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub(crate) fn rejected(source: ApiError, fallback: &str) -> Self {
        Self::Rejected {
            message: source.user_message(fallback),
            source,
        }
    }
}
