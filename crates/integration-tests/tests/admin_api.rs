//! Admin inventory, order and user management against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use secrecy::SecretString;
use stockroom_core::{
    ItemId, ItemImage, ItemInput, Money, OrderId, OrderStatus, Role, ShippingDetails, UserId,
};
use stockroom_integration_tests::FakeBackend;
use stockroom_storefront::AppContext;
use stockroom_storefront::api::{ApiError, Credentials, StatusUpdate};
use stockroom_storefront::storage::Storage;

async fn admin_context(backend: &FakeBackend) -> AppContext {
    backend.add_user("Grace", "grace@example.com", "admin-pass", "admin");
    let mut ctx = backend.context(Storage::memory()).await;
    ctx.login(&Credentials {
        email: "grace@example.com".to_string(),
        password: SecretString::from("admin-pass".to_string()),
    })
    .await
    .unwrap();
    backend.clear_requests();
    ctx
}

fn shipping() -> ShippingDetails {
    ShippingDetails {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        address: "12 St James's Square".to_string(),
        city: "London".to_string(),
        state: None,
        postal_code: "SW1Y 4JH".to_string(),
        country: "UK".to_string(),
        phone: None,
    }
}

fn lamp_form() -> ItemInput {
    ItemInput {
        name: "Desk lamp".to_string(),
        sku: None,
        description: Some("Warm light".to_string()),
        quantity: 4,
        price: Money::from_cents(2450),
        category: Some("Lighting".to_string()),
        image: None,
    }
}

#[tokio::test]
async fn test_create_item_as_json() {
    let backend = FakeBackend::start().await;
    let ctx = admin_context(&backend).await;

    let item = ctx.api.create_item(&lamp_form()).await.unwrap();

    assert_eq!(item.name, "Desk lamp");
    assert_eq!(item.price, Money::from_cents(2450));
    assert_eq!(item.quantity, 4);
    let request = &backend.requests()[0];
    assert_eq!(request.line(), "POST /api/items");
    assert!(request
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("application/json")));
}

#[tokio::test]
async fn test_create_item_with_image_is_multipart() {
    let backend = FakeBackend::start().await;
    let ctx = admin_context(&backend).await;
    let mut form = lamp_form();
    form.image = Some(ItemImage {
        file_name: "lamp.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    });

    let item = ctx.api.create_item(&form).await.unwrap();

    assert_eq!(item.image_url.as_deref(), Some("/uploads/lamp.png"));
    assert_eq!(item.quantity, 4);
    assert!(backend.requests()[0]
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data")));
}

#[tokio::test]
async fn test_item_list_is_cached_until_a_write() {
    let backend = FakeBackend::start().await;
    backend.add_item("Mug", 8.0, 10);
    let ctx = admin_context(&backend).await;
    let list_requests = || {
        backend
            .request_lines()
            .iter()
            .filter(|line| *line == "GET /api/items")
            .count()
    };

    assert_eq!(ctx.api.list_items().await.unwrap().len(), 1);
    assert_eq!(ctx.api.list_items().await.unwrap().len(), 1);
    assert_eq!(list_requests(), 1);

    let lamp = ctx.api.create_item(&lamp_form()).await.unwrap();
    assert_eq!(ctx.api.list_items().await.unwrap().len(), 2);
    assert_eq!(list_requests(), 2);

    ctx.api.delete_item(&lamp.id).await.unwrap();
    assert_eq!(ctx.api.list_items().await.unwrap().len(), 1);
    assert_eq!(list_requests(), 3);
}

#[tokio::test]
async fn test_update_and_missing_item() {
    let backend = FakeBackend::start().await;
    let mug = backend.add_item("Mug", 8.0, 10);
    let ctx = admin_context(&backend).await;

    let mut form = lamp_form();
    form.name = "Tall mug".to_string();
    let updated = ctx.api.update_item(&ItemId::new(&mug), &form).await.unwrap();
    assert_eq!(updated.name, "Tall mug");
    assert_eq!(ctx.api.get_item(&ItemId::new(&mug)).await.unwrap().name, "Tall mug");

    let err = ctx.api.get_item(&ItemId::new("missing")).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_delivered_status_marks_delivery_first() {
    let backend = FakeBackend::start().await;
    let mug = backend.add_item("Mug", 8.0, 10);
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let mut shopper = backend.context(Storage::memory()).await;
    shopper
        .login(&Credentials {
            email: "ada@example.com".to_string(),
            password: SecretString::from("secret123".to_string()),
        })
        .await
        .unwrap();
    shopper.cart.add(&ItemId::new(mug.as_str()), 1).await.unwrap();
    shopper.checkout.place_order(&shopper.cart).unwrap();
    shopper.checkout.submit_shipping(shipping()).unwrap();
    shopper.checkout.confirm_order(&mut shopper.cart).await.unwrap();
    let order_id = OrderId::new(backend.orders()[0]["_id"].as_str().unwrap());

    let ctx = admin_context(&backend).await;
    let order = ctx
        .api
        .update_order_status(&order_id, &StatusUpdate::new(OrderStatus::Delivered))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.is_delivered);
    assert_eq!(
        backend.request_lines(),
        vec![
            format!("PUT /api/orders/{order_id}/deliver"),
            format!("PUT /api/orders/{order_id}/status"),
        ]
    );

    let all = ctx.api.all_orders().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].order_number.as_deref(), Some("SR-00001"));
}

#[tokio::test]
async fn test_user_role_and_listing() {
    let backend = FakeBackend::start().await;
    let ada = backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let ctx = admin_context(&backend).await;

    let users = ctx.api.list_users().await.unwrap();
    assert_eq!(users.len(), 2);

    let promoted = ctx
        .api
        .update_user_role(&UserId::new(&ada), Role::Admin)
        .await
        .unwrap();
    assert!(promoted.is_admin());

    ctx.api.delete_user(&UserId::new(&ada)).await.unwrap();
    assert_eq!(ctx.api.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_regular_user_is_forbidden() {
    let backend = FakeBackend::start().await;
    backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let mut ctx = backend.context(Storage::memory()).await;
    ctx.login(&Credentials {
        email: "ada@example.com".to_string(),
        password: SecretString::from("secret123".to_string()),
    })
    .await
    .unwrap();

    let err = ctx.api.list_users().await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(err.user_message("fallback"), "Not authorized as an admin");
}
