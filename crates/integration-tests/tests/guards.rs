//! Route guards against a live backend.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use stockroom_core::Role;
use stockroom_integration_tests::FakeBackend;
use stockroom_storefront::AppError;
use stockroom_storefront::guards::{Guard, GuardOutcome};
use stockroom_storefront::services::AuthSession;
use stockroom_storefront::storage::{Storage, StorageArea, keys};
use stockroom_storefront::tokens::TokenStore;
use stockroom_storefront::api::ApiClient;

fn unresolved_session(backend: &FakeBackend, storage: Storage) -> AuthSession {
    let api = ApiClient::new(&backend.config(), TokenStore::new(storage)).unwrap();
    AuthSession::new(api)
}

#[tokio::test]
async fn test_guard_validates_stored_token_on_first_check() {
    let backend = FakeBackend::start().await;
    let ada = backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let storage = Storage::memory();
    TokenStore::new(storage.clone())
        .set(Role::User, &SecretString::from(backend.issue_token(&ada)))
        .unwrap();
    let mut auth = unresolved_session(&backend, storage);

    let outcome = Guard::Authenticated.check(&mut auth, "/orders").await;

    assert!(matches!(outcome, GuardOutcome::Allow(p) if p.name == "Ada"));
    assert_eq!(backend.request_lines(), vec!["GET /api/auth/me"]);

    // Resolved now, no second lookup
    Guard::Authenticated.check(&mut auth, "/orders").await;
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_guard_redirects_when_stored_token_is_rejected() {
    let backend = FakeBackend::start().await;
    let storage = Storage::memory();
    TokenStore::new(storage.clone())
        .set(Role::User, &SecretString::from("stale".to_string()))
        .unwrap();
    let mut auth = unresolved_session(&backend, storage.clone());

    let outcome = Guard::Authenticated.check(&mut auth, "/checkout").await;

    assert_eq!(
        outcome,
        GuardOutcome::RedirectToLogin {
            login: "/login",
            return_to: "/checkout".to_string(),
            message: "Please log in to access this page.",
        }
    );
    assert_eq!(
        storage.get(StorageArea::Session, keys::RETURN_TO).unwrap().as_deref(),
        Some("/checkout")
    );
    assert!(storage.get(StorageArea::Cookie, keys::USER_TOKEN).unwrap().is_none());
}

#[tokio::test]
async fn test_admin_guard_blocks_regular_users() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let mut ctx = backend.context(Storage::memory()).await;
    ctx.login(&stockroom_storefront::api::Credentials {
        email: "ada@example.com".to_string(),
        password: SecretString::from("secret123".to_string()),
    })
    .await
    .unwrap();

    let outcome = Guard::Admin.check(&mut ctx.auth, "/admin/items").await;
    assert_eq!(
        outcome,
        GuardOutcome::Unauthorized {
            redirect: "/unauthorized"
        }
    );

    let err = ctx.require(Guard::Admin, "/admin/items").await.unwrap_err();
    assert!(matches!(err, AppError::Denied(_)));
    ctx.require(Guard::Authenticated, "/orders").await.unwrap();
}

#[tokio::test]
async fn test_admin_guard_allows_admins() {
    let backend = FakeBackend::start().await;
    let grace = backend.add_user("Grace", "grace@example.com", "admin-pass", "admin");
    let storage = Storage::memory();
    TokenStore::new(storage.clone())
        .set(Role::Admin, &SecretString::from(backend.issue_token(&grace)))
        .unwrap();
    let mut auth = unresolved_session(&backend, storage);

    let outcome = Guard::Admin.check(&mut auth, "/admin/orders").await;
    assert!(matches!(outcome, GuardOutcome::Allow(p) if p.is_admin()));
}
