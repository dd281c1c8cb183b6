//! Application context.
//!
//! Owns one API client and the sessions built on it. There is no global
//! state: front-ends create an [`AppContext`] and pass it around.

use stockroom_core::Role;
use tracing::{info, instrument};

use crate::api::{ApiClient, Credentials, Registration};
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::guards::{Guard, GuardOutcome};
use crate::notify::Notice;
use crate::services::{AuthSession, CartSession, CheckoutFlow};
use crate::storage::Storage;
use crate::tokens::TokenStore;

/// Everything a running storefront client holds.
#[derive(Debug)]
pub struct AppContext {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub auth: AuthSession,
    pub cart: CartSession,
    pub checkout: CheckoutFlow,
}

impl AppContext {
    /// Open the state file, restore the session and load the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be opened or the HTTP
    /// client cannot be built. Backend failures never stop startup.
    pub async fn start(config: ClientConfig) -> Result<Self, AppError> {
        let storage = Storage::file(&config.state_file)?;
        Self::start_with(config, storage).await
    }

    /// [`start`](Self::start) over an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[instrument(skip_all, fields(api_url = %config.api_url))]
    pub async fn start_with(config: ClientConfig, storage: Storage) -> Result<Self, AppError> {
        let api = ApiClient::new(&config, TokenStore::new(storage))?;
        let mut ctx = Self {
            auth: AuthSession::new(api.clone()),
            cart: CartSession::new(api.clone()),
            checkout: CheckoutFlow::new(api.clone(), config.pricing),
            api,
            config,
        };

        let session = ctx.auth.restore().await;
        info!(role = ?session.role(), "Session restored");
        ctx.cart.load().await;
        Ok(ctx)
    }

    /// Log in, then reload the cart so a pending snapshot is restored.
    ///
    /// # Errors
    ///
    /// Returns an error if login fails.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Role, AppError> {
        let role = self.auth.login(credentials).await?;
        self.cart.load().await;
        Ok(role)
    }

    /// Register, then reload the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub async fn register(&mut self, registration: &Registration) -> Result<Role, AppError> {
        let role = self.auth.register(registration).await?;
        self.cart.load().await;
        Ok(role)
    }

    /// Log out and forget all client-side state. Returns the login path.
    pub fn logout(&mut self) -> &'static str {
        let path = self.auth.logout();
        self.cart.reset();
        self.checkout = CheckoutFlow::new(self.api.clone(), self.config.pricing);
        path
    }

    /// Run a guard and turn anything but `Allow` into an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Denied`] with the message to show.
    pub async fn require(&mut self, guard: Guard, path: &str) -> Result<(), AppError> {
        match guard.check(&mut self.auth, path).await {
            GuardOutcome::Allow(_) => Ok(()),
            GuardOutcome::RedirectToLogin { message, .. } => Err(AppError::Denied(message.to_owned())),
            GuardOutcome::Unauthorized { .. } => Err(AppError::Denied(
                "You are not authorized to access this page.".to_owned(),
            )),
        }
    }

    /// Drain every session's notices: auth, then cart, then checkout.
    ///
    /// Also ends the auth session if a rejected request cleared the tokens.
    pub fn notices(&mut self) -> Vec<Notice> {
        self.auth.sync();
        let mut notices = self.auth.notices();
        notices.extend(self.cart.notices());
        notices.extend(self.checkout.notices());
        notices
    }
}
