//! User administration endpoints (`/users`).

use reqwest::Method;
use serde_json::json;
use stockroom_core::{Role, UserId, UserProfile};
use tracing::instrument;

use super::{ApiClient, ApiError, Body, envelope};

impl ApiClient {
    /// Every registered account (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        let body = self.send(Method::GET, "users", Body::Empty).await?;
        envelope::decode(body, &["users"])
    }

    /// Change an account's role (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(user_id = %id, role = %role))]
    pub async fn update_user_role(&self, id: &UserId, role: Role) -> Result<UserProfile, ApiError> {
        let payload = json!({ "role": role });
        let body = self
            .send(Method::PUT, &format!("users/{id}/role"), Body::Json(&payload))
            .await?;
        envelope::decode(body, &["user"])
    }

    /// Delete an account (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("users/{id}"), Body::Empty)
            .await?;
        Ok(())
    }
}
