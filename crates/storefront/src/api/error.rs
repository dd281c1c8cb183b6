//! Error types for the backend API client.

use thiserror::Error;

/// Errors that can occur when talking to the backend.
///
/// Status-carrying variants keep the `message` field of the error body when
/// the backend sent one.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 401. Stored tokens have been cleared.
    #[error("unauthorized{}", suffix(.0.as_deref()))]
    Unauthorized(Option<String>),

    /// 403.
    #[error("forbidden{}", suffix(.0.as_deref()))]
    Forbidden(Option<String>),

    /// 404.
    #[error("not found{}", suffix(.0.as_deref()))]
    NotFound(Option<String>),

    /// 429.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("API error ({status}){}", suffix(.message.as_deref()))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message.
        message: Option<String>,
    },

    /// A success response whose body has no recognizable shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Failed to parse the response body.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

fn suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// The message the backend put in the error body.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Status { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Text to show a shopper.
    ///
    /// Prefers the server's message, then a description of the failure, then
    /// `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(message) = self.server_message() {
            return message.to_owned();
        }
        match self {
            Self::Http(e) if e.is_timeout() || e.is_connect() => {
                "No response from server. Please check your connection and try again.".to_owned()
            }
            Self::Http(e) => e.to_string(),
            Self::Unauthorized(_) => "Your session has expired. Please log in again.".to_owned(),
            Self::Forbidden(_) => "You do not have permission to do that.".to_owned(),
            Self::NotFound(_) => "The requested resource was not found.".to_owned(),
            Self::RateLimited(_) => "Too many requests. Please try again later.".to_owned(),
            Self::Status { status, .. } if *status >= 500 => {
                "Server error. Please try again later.".to_owned()
            }
            Self::UnexpectedResponse(_) => "Invalid response from server".to_owned(),
            Self::Status { .. } | Self::Parse(_) | Self::Url(_) => fallback.to_owned(),
        }
    }

    /// Whether this is a 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Whether this is a 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::RateLimited(30);
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");

        let err = ApiError::Status {
            status: 422,
            message: Some("Out of stock".to_string()),
        };
        assert_eq!(err.to_string(), "API error (422): Out of stock");

        assert_eq!(ApiError::NotFound(None).to_string(), "not found");
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Invalid order data".to_string()),
        };
        assert_eq!(err.user_message("Failed"), "Invalid order data");

        let err = ApiError::Unauthorized(Some("Token expired".to_string()));
        assert_eq!(err.user_message("Failed"), "Token expired");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Status {
            status: 400,
            message: Some("   ".to_string()),
        };
        assert_eq!(err.user_message("Failed to place order"), "Failed to place order");

        let err = ApiError::Status {
            status: 503,
            message: None,
        };
        assert_eq!(err.user_message("x"), "Server error. Please try again later.");

        assert_eq!(
            ApiError::Unauthorized(None).user_message("x"),
            "Your session has expired. Please log in again."
        );
    }
}
