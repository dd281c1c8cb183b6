//! Token store.
//!
//! Auth tokens live in the cookie and local storage areas under
//! role-specific keys. Callers look tokens up by [`Role`] and never touch the
//! storage keys directly.
//!
//! | Role  | Key             | Written to      | Read from (in order) |
//! |-------|-----------------|-----------------|----------------------|
//! | admin | `adminJwtToken` | cookie + local  | cookie, local        |
//! | user  | `userJwtToken`  | cookie          | cookie, local        |
//!
//! Tokens that are JWTs with an `exp` claim in the past are treated as
//! absent. Opaque tokens never expire client-side.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use stockroom_core::{Role, UserProfile};
use tracing::{debug, warn};

use crate::storage::{Storage, StorageArea, StorageError, keys};

/// An auth token tagged with the role it was issued for.
#[derive(Debug, Clone)]
pub struct RoleToken {
    pub role: Role,
    pub token: SecretString,
}

/// Reads and writes auth tokens, refresh tokens and cached profiles.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: Storage,
}

const fn token_key(role: Role) -> &'static str {
    match role {
        Role::Admin => keys::ADMIN_TOKEN,
        Role::User => keys::USER_TOKEN,
    }
}

const fn profile_key(role: Role) -> &'static str {
    match role {
        Role::Admin => keys::ADMIN_PROFILE,
        Role::User => keys::USER_PROFILE,
    }
}

const fn write_areas(role: Role) -> &'static [StorageArea] {
    match role {
        Role::Admin => &[StorageArea::Cookie, StorageArea::Local],
        Role::User => &[StorageArea::Cookie],
    }
}

const READ_AREAS: [StorageArea; 2] = [StorageArea::Cookie, StorageArea::Local];

impl TokenStore {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Look up the live token for a role.
    ///
    /// Storage read failures are logged and treated as "no token".
    #[must_use]
    pub fn get(&self, role: Role) -> Option<SecretString> {
        self.get_at(role, Utc::now())
    }

    fn get_at(&self, role: Role, now: DateTime<Utc>) -> Option<SecretString> {
        let key = token_key(role);
        for area in READ_AREAS {
            match self.storage.get(area, key) {
                Ok(Some(token)) if !token.trim().is_empty() => {
                    if is_expired(&token, now) {
                        debug!(%role, ?area, "Ignoring expired token");
                        continue;
                    }
                    return Some(SecretString::from(token));
                }
                Ok(_) => {}
                Err(e) => warn!(%role, ?area, error = %e, "Failed to read token"),
            }
        }
        None
    }

    /// Persist a token for a role.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn set(&self, role: Role, token: &SecretString) -> Result<(), StorageError> {
        for area in write_areas(role) {
            self.storage.set(*area, token_key(role), token.expose_secret())?;
        }
        Ok(())
    }

    /// Remove a role's token from every area it may be stored in.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn remove(&self, role: Role) -> Result<(), StorageError> {
        for area in READ_AREAS {
            self.storage.remove(area, token_key(role))?;
        }
        Ok(())
    }

    /// The token to present to the backend: admin wins over user.
    #[must_use]
    pub fn active(&self) -> Option<RoleToken> {
        [Role::Admin, Role::User].into_iter().find_map(|role| {
            self.get(role).map(|token| RoleToken { role, token })
        })
    }

    /// Whether any live token is stored.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.active().is_some()
    }

    /// The stored refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.storage
            .get(StorageArea::Local, keys::REFRESH_TOKEN)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn set_refresh_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.storage
            .set(StorageArea::Local, keys::REFRESH_TOKEN, token.expose_secret())
    }

    /// Profile cached at login for a role.
    #[must_use]
    pub fn profile(&self, role: Role) -> Option<UserProfile> {
        self.storage
            .get_json(StorageArea::Local, profile_key(role))
            .unwrap_or_else(|e| {
                warn!(%role, error = %e, "Discarding unreadable cached profile");
                None
            })
    }

    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn set_profile(&self, role: Role, profile: &UserProfile) -> Result<(), StorageError> {
        self.storage
            .set_json(StorageArea::Local, profile_key(role), profile)
    }

    /// Forget one role entirely: its token and cached profile.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn forget(&self, role: Role) -> Result<(), StorageError> {
        self.remove(role)?;
        self.storage.remove(StorageArea::Local, profile_key(role))
    }

    /// Remove every token, refresh token and cached profile.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        for role in [Role::Admin, Role::User] {
            self.forget(role)?;
        }
        self.storage.remove(StorageArea::Local, keys::REFRESH_TOKEN)
    }
}

// =============================================================================
// JWT expiry
// =============================================================================

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// The `exp` claim of a JWT, if the token is a JWT and carries one.
///
/// The signature is not verified; the backend does that.
#[must_use]
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}

/// Whether the token's `exp` claim is at or before `now`.
#[must_use]
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    jwt_expiry(token).is_some_and(|exp| exp <= now)
}
