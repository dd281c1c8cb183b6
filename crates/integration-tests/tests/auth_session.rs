//! Auth session, token storage and 401 handling against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use stockroom_core::Role;
use stockroom_integration_tests::FakeBackend;
use stockroom_storefront::api::{ApiError, Credentials, Registration};
use stockroom_storefront::guards::Guard;
use stockroom_storefront::services::{AuthError, Session};
use stockroom_storefront::storage::{Storage, StorageArea, keys};

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: SecretString::from(password.to_string()),
    }
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[tokio::test]
async fn test_user_login_stores_token_in_cookie_area() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let storage = Storage::memory();
    let mut ctx = backend.context(storage.clone()).await;

    let role = ctx
        .login(&credentials("ada@example.com", "secret123"))
        .await
        .unwrap();

    assert_eq!(role, Role::User);
    assert!(matches!(ctx.auth.session(), Session::User(p) if p.email == "ada@example.com"));
    assert!(storage.get(StorageArea::Cookie, keys::USER_TOKEN).unwrap().is_some());
    assert!(storage.get(StorageArea::Local, keys::USER_TOKEN).unwrap().is_none());
    assert!(storage.get(StorageArea::Local, keys::USER_PROFILE).unwrap().is_some());
    assert_eq!(ctx.notices()[0].message, "Login successful");
}

#[tokio::test]
async fn test_admin_login_stores_token_in_cookie_and_local() {
    let backend = FakeBackend::start().await;
    backend.add_user("Grace", "grace@example.com", "admin-pass", "admin");
    let storage = Storage::memory();
    let mut ctx = backend.context(storage.clone()).await;

    let role = ctx
        .login(&credentials("grace@example.com", "admin-pass"))
        .await
        .unwrap();

    assert_eq!(role, Role::Admin);
    assert!(ctx.auth.session().is_admin());
    for area in [StorageArea::Cookie, StorageArea::Local] {
        assert!(storage.get(area, keys::ADMIN_TOKEN).unwrap().is_some());
    }
    assert_eq!(ctx.api.tokens().active().unwrap().role, Role::Admin);
}

#[tokio::test]
async fn test_wrong_password_reports_server_message() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let storage = Storage::memory();
    let mut ctx = backend.context(storage.clone()).await;

    let err = ctx
        .auth
        .login(&credentials("ada@example.com", "nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Rejected { .. }));
    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(ctx.auth.session(), &Session::Unauthenticated);
    assert!(!ctx.api.tokens().has_any());
    assert_eq!(ctx.notices()[0].message, "Invalid email or password");
}

#[tokio::test]
async fn test_register_logs_in_as_user() {
    let backend = FakeBackend::start().await;
    let mut ctx = backend.context(Storage::memory()).await;

    let role = ctx
        .register(&Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: secret("secret123"),
        })
        .await
        .unwrap();
    assert_eq!(role, Role::User);
    assert_eq!(ctx.auth.session().profile().unwrap().name, "Ada");

    let err = ctx
        .auth
        .register(&Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: secret("secret123"),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User already exists");
}

#[tokio::test]
async fn test_restore_validates_stored_tokens() {
    let backend = FakeBackend::start().await;
    let ada = backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let storage = Storage::memory();
    let tokens = stockroom_storefront::tokens::TokenStore::new(storage.clone());
    tokens.set(Role::User, &secret(&backend.issue_token(&ada))).unwrap();

    let ctx = backend.context(storage).await;
    assert!(ctx.auth.is_resolved());
    assert!(matches!(ctx.auth.session(), Session::User(p) if p.name == "Ada"));
}

#[tokio::test]
async fn test_restore_drops_admin_token_of_non_admin() {
    let backend = FakeBackend::start().await;
    let ada = backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let storage = Storage::memory();
    let tokens = stockroom_storefront::tokens::TokenStore::new(storage.clone());
    // An admin-keyed token that belongs to a regular account
    tokens.set(Role::Admin, &secret(&backend.issue_token(&ada))).unwrap();
    tokens.set(Role::User, &secret(&backend.issue_token(&ada))).unwrap();

    let ctx = backend.context(storage.clone()).await;
    assert!(matches!(ctx.auth.session(), Session::User(_)));
    for area in StorageArea::ALL {
        assert!(storage.get(area, keys::ADMIN_TOKEN).unwrap().is_none());
    }
    assert!(storage.get(StorageArea::Cookie, keys::USER_TOKEN).unwrap().is_some());
}

#[tokio::test]
async fn test_restore_with_rejected_tokens_is_unauthenticated() {
    let backend = FakeBackend::start().await;
    let storage = Storage::memory();
    let tokens = stockroom_storefront::tokens::TokenStore::new(storage.clone());
    tokens.set(Role::Admin, &secret("revoked-admin")).unwrap();
    tokens.set(Role::User, &secret("revoked-user")).unwrap();

    let ctx = backend.context(storage).await;
    assert_eq!(ctx.auth.session(), &Session::Unauthenticated);
    assert!(!ctx.api.tokens().has_any());
}

#[tokio::test]
async fn test_expired_jwt_is_never_sent() {
    let backend = FakeBackend::start().await;
    let storage = Storage::memory();
    let exp = (Utc::now() - Duration::minutes(5)).timestamp();
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":"u1","exp":{exp}}}"#));
    let expired = format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig");
    storage
        .set(StorageArea::Cookie, keys::USER_TOKEN, &expired)
        .unwrap();

    let ctx = backend.context(storage).await;
    assert_eq!(ctx.auth.session(), &Session::Unauthenticated);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_logout_clears_every_key_and_session_area() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    backend.issue_refresh_tokens(true);
    let storage = Storage::memory();
    let mut ctx = backend.context(storage.clone()).await;
    ctx.login(&credentials("ada@example.com", "secret123"))
        .await
        .unwrap();
    storage
        .set(StorageArea::Session, keys::RETURN_TO, "/orders")
        .unwrap();
    assert!(ctx.api.tokens().refresh_token().is_some());

    assert_eq!(ctx.logout(), "/login");

    assert_eq!(ctx.auth.session(), &Session::Unauthenticated);
    for key in [
        keys::USER_TOKEN,
        keys::ADMIN_TOKEN,
        keys::USER_PROFILE,
        keys::ADMIN_PROFILE,
        keys::REFRESH_TOKEN,
    ] {
        for area in StorageArea::ALL {
            assert!(storage.get(area, key).unwrap().is_none(), "{key} left in {area:?}");
        }
    }
    assert!(storage.get(StorageArea::Session, keys::RETURN_TO).unwrap().is_none());
}

#[tokio::test]
async fn test_requests_carry_bearer_legacy_and_request_id() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let mut ctx = backend.context(Storage::memory()).await;
    ctx.login(&credentials("ada@example.com", "secret123"))
        .await
        .unwrap();
    backend.clear_requests();

    ctx.api.my_orders().await.unwrap();

    let token = ctx.api.tokens().get(Role::User).unwrap();
    let request = &backend.requests()[0];
    assert_eq!(request.bearer.as_deref(), Some(token.expose_secret()));
    assert_eq!(request.legacy_token.as_deref(), Some(token.expose_secret()));
    assert!(request.request_id.as_deref().is_some_and(|id| id.len() == 36));
}

#[tokio::test]
async fn test_unauthorized_without_refresh_token_clears_tokens() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let mut ctx = backend.context(Storage::memory()).await;
    ctx.login(&credentials("ada@example.com", "secret123"))
        .await
        .unwrap();

    backend.revoke_tokens();
    let err = ctx.api.my_orders().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert!(!ctx.api.tokens().has_any());
    assert_eq!(ctx.auth.session(), &Session::Unauthenticated);
    ctx.notices();
    ctx.require(Guard::Authenticated, "/orders").await.unwrap_err();
}

#[tokio::test]
async fn test_unauthorized_refreshes_once_and_retries() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    backend.issue_refresh_tokens(true);
    let mut ctx = backend.context(Storage::memory()).await;
    ctx.login(&credentials("ada@example.com", "secret123"))
        .await
        .unwrap();
    let old = ctx.api.tokens().get(Role::User).unwrap();

    backend.revoke_tokens();
    backend.clear_requests();
    let orders = ctx.api.my_orders().await.unwrap();

    assert!(orders.is_empty());
    assert_eq!(
        backend.request_lines(),
        vec![
            "GET /api/orders/myorders",
            "POST /api/auth/refresh-token",
            "GET /api/orders/myorders",
        ]
    );
    let new = ctx.api.tokens().get(Role::User).unwrap();
    assert_ne!(new.expose_secret(), old.expose_secret());
}
