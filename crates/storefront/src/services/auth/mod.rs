//! Auth session.
//!
//! Holds who is logged in. Populated at startup from stored tokens
//! ([`AuthSession::restore`]) and changed by [`AuthSession::login`],
//! [`AuthSession::register`] and [`AuthSession::logout`].
//!
//! Tokens themselves live in the [`TokenStore`](crate::tokens::TokenStore);
//! this type only decides which identity they resolve to.

mod error;

pub use error::AuthError;

use secrecy::SecretString;
use stockroom_core::{Role, UserProfile};
use tracing::{debug, info, instrument, warn};

use crate::api::wire::AuthResponse;
use crate::api::{ApiClient, Credentials, Registration};
use crate::notify::{Notice, Outbox};
use crate::storage::{StorageArea, keys};
use crate::tokens::TokenStore;

/// Where a logged-out shopper is sent.
pub const LOGIN_PATH: &str = "/login";

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const LOGIN_NO_TOKEN: &str = "Login successful but no token received";
const REGISTRATION_NO_TOKEN: &str = "Registration successful but no token received";

/// The resolved identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    User(UserProfile),
    Admin(UserProfile),
}

impl Session {
    fn from_profile(profile: UserProfile) -> Self {
        if profile.is_admin() {
            Self::Admin(profile)
        } else {
            Self::User(profile)
        }
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Unauthenticated => None,
            Self::User(profile) | Self::Admin(profile) => Some(profile),
        }
    }

    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Unauthenticated => None,
            Self::User(_) => Some(Role::User),
            Self::Admin(_) => Some(Role::Admin),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }
}

/// Current-user state.
#[derive(Debug)]
pub struct AuthSession {
    api: ApiClient,
    session: Session,
    resolved: bool,
    outbox: Outbox,
}

impl AuthSession {
    /// An unresolved session. Call [`restore`](Self::restore) before relying
    /// on [`session`](Self::session).
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session: Session::Unauthenticated,
            resolved: false,
            outbox: Outbox::default(),
        }
    }

    /// The current identity.
    ///
    /// Reports [`Session::Unauthenticated`] as soon as the stored tokens are
    /// gone, even before [`sync`](Self::sync) runs.
    #[must_use]
    pub fn session(&self) -> &Session {
        static SIGNED_OUT: Session = Session::Unauthenticated;
        if self.session.is_authenticated() && !self.api.tokens().has_any() {
            return &SIGNED_OUT;
        }
        &self.session
    }

    /// Whether stored tokens have been validated since startup.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        self.api.tokens()
    }

    /// Whether any live token is stored, validated or not.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.api.tokens().has_any()
    }

    pub fn notices(&mut self) -> Vec<Notice> {
        self.outbox.drain()
    }

    /// Remember where to go once logged in.
    pub(crate) fn remember_return_path(&self, path: &str) {
        if let Err(e) = self
            .api
            .tokens()
            .storage()
            .set(StorageArea::Session, keys::RETURN_TO, path)
        {
            warn!(error = %e, "Failed to remember return path");
        }
    }

    /// Validate stored tokens against `/auth/me`.
    ///
    /// The admin token is tried first and removed if it fails or resolves
    /// to a non-admin profile; then the user token. Never fails: anything
    /// unexpected leaves the session unauthenticated.
    #[instrument(skip(self))]
    pub async fn restore(&mut self) -> &Session {
        self.session = Session::Unauthenticated;
        let tokens = self.api.tokens().clone();

        if let Some(token) = tokens.get(Role::Admin) {
            match self.api.me_with(&token).await {
                Ok(profile) if profile.is_admin() => {
                    self.adopt(Role::Admin, profile);
                    return &self.session;
                }
                Ok(profile) => {
                    warn!(user_id = %profile.id, "Admin token belongs to a non-admin account");
                    self.forget(Role::Admin);
                }
                Err(e) => {
                    debug!(error = %e, "Stored admin token rejected");
                    self.forget(Role::Admin);
                }
            }
        }

        if let Some(token) = tokens.get(Role::User) {
            match self.api.me_with(&token).await {
                Ok(profile) => self.adopt(Role::User, profile),
                Err(e) => {
                    debug!(error = %e, "Stored user token rejected");
                    self.forget(Role::User);
                }
            }
        }

        self.resolved = true;
        &self.session
    }

    /// Drop to unauthenticated if the stored tokens are gone (a 401 clears
    /// them).
    pub fn sync(&mut self) {
        if self.session.is_authenticated() && !self.api.tokens().has_any() {
            info!("Stored tokens were cleared, session ended");
            self.session = Session::Unauthenticated;
        }
    }

    /// Log in and persist the token for the account's role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the backend rejects the credentials, sends no
    /// token, or the token cannot be stored.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Role, AuthError> {
        let result = match self.api.login(credentials).await {
            Ok(response) => self.accept(response, LOGIN_NO_TOKEN).await,
            Err(e) => Err(AuthError::rejected(e, LOGIN_FAILED)),
        };
        self.report(result, "Login successful")
    }

    /// Create an account and log in as it.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    #[instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(&mut self, registration: &Registration) -> Result<Role, AuthError> {
        let result = match self.api.register(registration).await {
            Ok(response) => self.accept(response, REGISTRATION_NO_TOKEN).await,
            Err(e) => Err(AuthError::rejected(e, REGISTRATION_FAILED)),
        };
        self.report(result, "Registration successful")
    }

    /// Forget every credential and the whole session area.
    ///
    /// Returns the view to navigate to.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> &'static str {
        if let Err(e) = self.api.tokens().clear_all() {
            warn!(error = %e, "Failed to clear stored tokens");
        }
        if let Err(e) = self.api.tokens().storage().clear(StorageArea::Session) {
            warn!(error = %e, "Failed to clear session storage");
        }
        self.session = Session::Unauthenticated;
        self.resolved = true;
        self.outbox.push(Notice::info("Logged out"));
        LOGIN_PATH
    }

    async fn accept(
        &mut self,
        response: AuthResponse,
        missing: &'static str,
    ) -> Result<Role, AuthError> {
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or(AuthError::MissingToken(missing))?;

        let profile = match response.user {
            Some(profile) => profile,
            None => self
                .api
                .me_with(&token)
                .await
                .map_err(|e| AuthError::rejected(e, LOGIN_FAILED))?,
        };

        let role = profile.role;
        let other = match role {
            Role::Admin => Role::User,
            Role::User => Role::Admin,
        };
        let tokens = self.api.tokens();
        tokens.forget(other)?;
        tokens.set(role, &token)?;
        tokens.set_profile(role, &profile)?;
        if let Some(refresh) = response.refresh_token.filter(|t| !t.is_empty()) {
            tokens.set_refresh_token(&SecretString::from(refresh))?;
        }

        info!(user_id = %profile.id, %role, "Logged in");
        self.session = Session::from_profile(profile);
        self.resolved = true;
        Ok(role)
    }

    fn adopt(&mut self, role: Role, profile: UserProfile) {
        if let Err(e) = self.api.tokens().set_profile(role, &profile) {
            warn!(error = %e, "Failed to cache profile");
        }
        debug!(user_id = %profile.id, %role, "Session restored");
        self.session = Session::from_profile(profile);
    }

    fn forget(&self, role: Role) {
        if let Err(e) = self.api.tokens().forget(role) {
            warn!(%role, error = %e, "Failed to remove stored token");
        }
    }

    fn report(&mut self, result: Result<Role, AuthError>, success: &str) -> Result<Role, AuthError> {
        match &result {
            Ok(_) => self.outbox.push(Notice::success(success)),
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                self.outbox.push(Notice::error(e.to_string()));
            }
        }
        result
    }
}
