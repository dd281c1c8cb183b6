//! Backend REST API client.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per application, cheaply cloneable (`Arc` inner)
//! - Every request carries the active token (admin over user) as
//!   `Authorization: Bearer` and legacy `x-auth-token`, plus an
//!   `x-request-id` for correlation
//! - Envelope normalization happens once, in [`envelope::decode`]
//! - Inventory lookups are cached via `moka` (5 minute TTL) and invalidated
//!   by admin writes
//!
//! # 401 handling
//!
//! A 401 on a session request triggers at most one `POST
//! /auth/refresh-token` (when a refresh token is stored) and one retry. If
//! that does not help, every stored token is cleared and
//! [`ApiError::Unauthorized`] is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockroom_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(&config, tokens)?;
//! let items = api.list_items().await?;
//! let cart = api.add_to_cart(&items[0].id, 1).await?;
//! ```

mod auth;
mod cache;
mod cart;
pub mod envelope;
mod error;
mod items;
mod orders;
mod users;
pub mod wire;

pub use auth::{Credentials, Registration};
pub use error::ApiError;
pub use orders::StatusUpdate;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use stockroom_core::{ItemInput, Role};
use tracing::{debug, error, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::tokens::{RoleToken, TokenStore};

use cache::{CacheKey, CacheValue};
use wire::AuthResponse;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Legacy auth header some backend routes still read.
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// Which token, if any, a request presents.
#[derive(Debug, Clone)]
enum Credential {
    /// The priority-resolved stored token. 401s refresh, retry, then clear.
    Active,
    /// A specific token chosen by the caller. 401s are returned as-is.
    Explicit(SecretString),
    /// No token.
    Anonymous,
}

/// Request body.
#[derive(Debug, Clone, Copy)]
enum Body<'a> {
    Empty,
    Json(&'a Value),
    /// Multipart when the form carries an image, JSON otherwise.
    Item(&'a ItemInput),
}

/// Client for the storefront backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base: Url,
    tokens: TokenStore,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.inner.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base: config.api_url.clone(),
                tokens,
                cache,
            }),
        })
    }

    /// The token store requests draw their credentials from.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Backend API root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base.join(path.trim_start_matches('/'))?)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Send a request with the active session token.
    async fn send(&self, method: Method, path: &str, body: Body<'_>) -> Result<Value, ApiError> {
        self.send_as(method, path, body, Credential::Active).await
    }

    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn send_as(
        &self,
        method: Method,
        path: &str,
        body: Body<'_>,
        credential: Credential,
    ) -> Result<Value, ApiError> {
        let url = self.url(path)?;

        let token = match &credential {
            Credential::Active => self.inner.tokens.active().map(|t| t.token),
            Credential::Explicit(token) => Some(token.clone()),
            Credential::Anonymous => None,
        };

        let response = self.dispatch(&method, &url, body, token.as_ref()).await?;
        let message = match read(response).await {
            Err(ApiError::Unauthorized(message)) => message,
            other => return other,
        };
        if !matches!(credential, Credential::Active) {
            return Err(ApiError::Unauthorized(message));
        }

        let Some(refreshed) = self.refresh_session().await else {
            self.drop_session();
            return Err(ApiError::Unauthorized(message));
        };

        debug!(role = %refreshed.role, "Retrying request with refreshed token");
        let retry = self
            .dispatch(&method, &url, body, Some(&refreshed.token))
            .await?;
        match read(retry).await {
            Err(ApiError::Unauthorized(message)) => {
                self.drop_session();
                Err(ApiError::Unauthorized(message))
            }
            other => other,
        }
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &Url,
        body: Body<'_>,
        token: Option<&SecretString>,
    ) -> Result<Response, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = self
            .inner
            .client
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = token {
            request = with_token(request, token);
        }

        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::Item(input) => match &input.image {
                Some(_) => request.multipart(items::multipart_form(input)?),
                None => request.json(&input.to_json()),
            },
        };

        debug!(request_id = %request_id, "Sending request");
        Ok(request.send().await?)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Returns `None` when there is no refresh token or the exchange fails.
    async fn refresh_session(&self) -> Option<RoleToken> {
        let refresh = self.inner.tokens.refresh_token()?;
        let failed_role = self
            .inner
            .tokens
            .active()
            .map_or(Role::User, |active| active.role);

        let response = match self.exchange_refresh(&refresh).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                return None;
            }
        };

        let token = SecretString::from(response.token.filter(|t| !t.is_empty())?);
        let role = response.user.as_ref().map_or(failed_role, |user| user.role);
        if let Err(e) = self.inner.tokens.set(role, &token) {
            warn!(error = %e, "Failed to store refreshed token");
        }
        if let Some(new_refresh) = response.refresh_token.filter(|t| !t.is_empty())
            && let Err(e) = self
                .inner
                .tokens
                .set_refresh_token(&SecretString::from(new_refresh))
        {
            warn!(error = %e, "Failed to store refresh token");
        }
        Some(RoleToken { role, token })
    }

    /// `POST /auth/refresh-token` without touching stored state.
    async fn exchange_refresh(&self, refresh: &SecretString) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({ "refreshToken": refresh.expose_secret() });
        let url = self.url("auth/refresh-token")?;
        let response = self
            .dispatch(&Method::POST, &url, Body::Json(&body), None)
            .await?;
        envelope::decode(read(response).await?, &[])
    }

    /// Forget every stored credential after an unrecoverable 401.
    fn drop_session(&self) {
        warn!("Session rejected by backend, clearing stored tokens");
        if let Err(e) = self.inner.tokens.clear_all() {
            error!(error = %e, "Failed to clear stored tokens");
        }
    }
}

fn with_token(request: RequestBuilder, token: &SecretString) -> RequestBuilder {
    let raw = token.expose_secret();
    match (
        HeaderValue::from_str(&format!("Bearer {raw}")),
        HeaderValue::from_str(raw),
    ) {
        (Ok(mut bearer), Ok(mut legacy)) => {
            bearer.set_sensitive(true);
            legacy.set_sensitive(true);
            request
                .header(AUTHORIZATION, bearer)
                .header(LEGACY_TOKEN_HEADER, legacy)
        }
        _ => {
            warn!("Stored token is not a valid header value, sending request without it");
            request
        }
    }
}

/// Map a response to its JSON body or a typed error.
async fn read(response: Response) -> Result<Value, ApiError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ApiError::RateLimited(retry_after));
    }

    // Get response body as text first for better error diagnostics
    let text = response.text().await?;

    if !status.is_success() {
        let message = server_message(&text);
        debug!(
            status = %status,
            body = %text.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );
        return Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| {
        error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}

/// The `message` (or `error`) string of an error body.
fn server_message(text: &str) -> Option<String> {
    let body: Value = serde_json::from_str(text).ok()?;
    ["message", "error"]
        .into_iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}
