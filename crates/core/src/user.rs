//! User profile as reported by the identity endpoints.

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// The identity of a logged-in account.
///
/// Also persisted as JSON next to the token so the CLI can show who is logged
/// in without a network round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user ID.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address as stored by the backend.
    #[serde(default)]
    pub email: String,
    /// Role claim.
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    /// Whether the profile carries the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mongo_style_id() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"_id":"u1","name":"Ada","email":"ada@shop.io","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(profile.id.as_str(), "u1");
        assert!(profile.is_admin());
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let profile: UserProfile = serde_json::from_str(r#"{"id":"u2"}"#).unwrap();
        assert_eq!(profile.role, Role::User);
        assert!(profile.name.is_empty());
    }
}
