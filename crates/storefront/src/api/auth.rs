//! Identity endpoints (`/auth`).

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use stockroom_core::UserProfile;
use tracing::instrument;

use super::wire::AuthResponse;
use super::{ApiClient, ApiError, Body, Credential, envelope};

/// Login form.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Registration form.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl ApiClient {
    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let payload = serde_json::to_value(credentials)?;
        let body = self
            .send_as(
                Method::POST,
                "auth/login",
                Body::Json(&payload),
                Credential::Anonymous,
            )
            .await?;
        envelope::decode(body, &[])
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let payload = serde_json::to_value(registration)?;
        let body = self
            .send_as(
                Method::POST,
                "auth/register",
                Body::Json(&payload),
                Credential::Anonymous,
            )
            .await?;
        envelope::decode(body, &[])
    }

    /// Profile behind the active token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let body = self.send(Method::GET, "auth/me", Body::Empty).await?;
        envelope::decode(body, &["user"])
    }

    /// Profile behind a specific token.
    ///
    /// A 401 here does not clear stored tokens; the caller decides what to
    /// forget.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip_all)]
    pub async fn me_with(&self, token: &SecretString) -> Result<UserProfile, ApiError> {
        let body = self
            .send_as(
                Method::GET,
                "auth/me",
                Body::Empty,
                Credential::Explicit(token.clone()),
            )
            .await?;
        envelope::decode(body, &["user"])
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Nothing is stored; see the 401 handling in [`ApiClient`] for the
    /// automatic variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip_all)]
    pub async fn refresh_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        self.exchange_refresh(refresh_token).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_serialized_but_not_debugged() {
        let credentials = Credentials {
            email: "ada@example.com".to_string(),
            password: SecretString::from("hunter22".to_string()),
        };
        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(json["password"], "hunter22");
        assert!(!format!("{credentials:?}").contains("hunter22"));
    }
}
