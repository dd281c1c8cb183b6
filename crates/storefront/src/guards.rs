//! Route guards.
//!
//! Gate protected views on the [`AuthSession`]. When the session has not
//! been resolved yet but a token is stored, the guard validates it against
//! `/auth/me` before deciding.

use stockroom_core::UserProfile;
use tracing::{debug, warn};

use crate::services::AuthSession;
use crate::services::auth::LOGIN_PATH;

/// Where a non-admin is sent from an admin view.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// What a view requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any logged-in account.
    Authenticated,
    /// An admin account.
    Admin,
}

/// Decision for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow(UserProfile),
    RedirectToLogin {
        login: &'static str,
        return_to: String,
        message: &'static str,
    },
    Unauthorized {
        redirect: &'static str,
    },
}

impl Guard {
    const fn login_message(self) -> &'static str {
        match self {
            Self::Authenticated => "Please log in to access this page.",
            Self::Admin => "Please log in to access the admin panel.",
        }
    }

    /// Decide whether the current session may view `path`.
    ///
    /// A redirect to login records `path` under `returnTo` in the session
    /// area.
    pub async fn check(self, auth: &mut AuthSession, path: &str) -> GuardOutcome {
        if !auth.is_resolved() && auth.has_token() {
            debug!(path, "Validating stored token before guard check");
            auth.restore().await;
        }
        auth.sync();

        let Some(profile) = auth.session().profile() else {
            auth.remember_return_path(path);
            return GuardOutcome::RedirectToLogin {
                login: LOGIN_PATH,
                return_to: path.to_owned(),
                message: self.login_message(),
            };
        };

        if self == Self::Admin && !auth.session().is_admin() {
            warn!(user_id = %profile.id, path, "Non-admin blocked from admin view");
            return GuardOutcome::Unauthorized {
                redirect: UNAUTHORIZED_PATH,
            };
        }

        GuardOutcome::Allow(profile.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::ClientConfig;
    use crate::storage::{Storage, StorageArea, keys};
    use crate::tokens::TokenStore;

    fn auth(storage: &Storage) -> AuthSession {
        let config = ClientConfig::new("http://127.0.0.1:9/api", "unused.json").unwrap();
        AuthSession::new(ApiClient::new(&config, TokenStore::new(storage.clone())).unwrap())
    }

    #[tokio::test]
    async fn test_anonymous_redirected_with_return_path() {
        let storage = Storage::memory();
        let mut auth = auth(&storage);

        let outcome = Guard::Admin.check(&mut auth, "/admin/orders").await;
        assert_eq!(
            outcome,
            GuardOutcome::RedirectToLogin {
                login: "/login",
                return_to: "/admin/orders".to_string(),
                message: "Please log in to access the admin panel.",
            }
        );
        assert_eq!(
            storage.get(StorageArea::Session, keys::RETURN_TO).unwrap().as_deref(),
            Some("/admin/orders")
        );
    }
}
