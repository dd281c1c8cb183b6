//! Checkout flow against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use secrecy::SecretString;
use stockroom_core::{ItemId, Money, ShippingDetails};
use stockroom_integration_tests::FakeBackend;
use stockroom_storefront::AppContext;
use stockroom_storefront::api::Credentials;
use stockroom_storefront::notify::NoticeLevel;
use stockroom_storefront::services::{CheckoutError, CheckoutState, PlaceOrder};
use stockroom_storefront::storage::Storage;

fn shipping() -> ShippingDetails {
    ShippingDetails {
        first_name: " Ada ".to_string(),
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

async fn logged_in(backend: &FakeBackend) -> (AppContext, String) {
    let user_id = backend.add_user("Ada", "ada@example.com", "secret123", "user");
    let mut ctx = backend.context(Storage::memory()).await;
    ctx.login(&Credentials {
        email: "ada@example.com".to_string(),
        password: SecretString::from("secret123".to_string()),
    })
    .await
    .unwrap();
    ctx.notices();
    (ctx, user_id)
}

fn to_review(ctx: &mut AppContext) {
    assert_eq!(ctx.checkout.place_order(&ctx.cart).unwrap(), PlaceOrder::Shipping);
    ctx.checkout.submit_shipping(shipping()).unwrap();
    assert_eq!(ctx.checkout.state(), &CheckoutState::Review);
}

#[tokio::test]
async fn test_full_checkout_places_order_and_clears_cart() {
    let backend = FakeBackend::start().await;
    let lamp = backend.add_item("Desk Lamp", 60.0, 5);
    let (mut ctx, user_id) = logged_in(&backend).await;

    ctx.cart.add(&ItemId::new(lamp.as_str()), 2).await.unwrap();
    assert_eq!(ctx.cart.item_count(), 2);
    assert_eq!(ctx.cart.subtotal(), Money::from_units(120));

    to_review(&mut ctx);
    let confirmation = ctx.checkout.confirm_order(&mut ctx.cart).await.unwrap();

    assert_eq!(confirmation.order_number, "SR-00001");
    assert_eq!(confirmation.total, Money::from_cents(13_800));
    assert_eq!(confirmation.email, "ada@example.com");
    assert_eq!(confirmation.items.len(), 1);
    assert!(matches!(ctx.checkout.state(), CheckoutState::Success(_)));

    let orders = backend.orders();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order["itemsPrice"], 120.0);
    assert_eq!(order["taxPrice"], 18.0);
    assert_eq!(order["shippingPrice"], 0.0);
    assert_eq!(order["totalPrice"], 138.0);
    assert_eq!(order["paymentMethod"], "Credit Card");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["isPaid"], false);
    assert_eq!(order["orderItems"][0]["item"], lamp.as_str());
    assert_eq!(order["orderItems"][0]["quantity"], 2);
    assert_eq!(order["shippingAddress"]["firstName"], "Ada");
    assert_eq!(order["shippingAddress"]["fullName"], "Ada Lovelace");
    assert_eq!(order["shippingAddress"]["zipCode"], "SW1Y 4JH");

    assert!(backend.cart_of(&user_id).is_empty());
    assert!(ctx.cart.cart().is_empty());

    let notices = ctx.notices();
    assert_eq!(notices.last().unwrap().message, "Order placed successfully!");
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_subtotal_of_exactly_one_hundred_pays_shipping() {
    let backend = FakeBackend::start().await;
    let mug = backend.add_item("Mug", 50.0, 10);
    let (mut ctx, _) = logged_in(&backend).await;

    ctx.cart.add(&ItemId::new(mug.as_str()), 2).await.unwrap();
    to_review(&mut ctx);
    let confirmation = ctx.checkout.confirm_order(&mut ctx.cart).await.unwrap();

    assert_eq!(confirmation.total, Money::from_units(125));
    let order = &backend.orders()[0];
    assert_eq!(order["itemsPrice"], 100.0);
    assert_eq!(order["taxPrice"], 15.0);
    assert_eq!(order["shippingPrice"], 10.0);
}

#[tokio::test]
async fn test_cart_clear_failure_does_not_undo_success() {
    let backend = FakeBackend::start().await;
    let lamp = backend.add_item("Desk Lamp", 60.0, 5);
    let (mut ctx, user_id) = logged_in(&backend).await;

    ctx.cart.add(&ItemId::new(lamp.as_str()), 1).await.unwrap();
    to_review(&mut ctx);
    backend.fail_cart_clear(true);

    let confirmation = ctx.checkout.confirm_order(&mut ctx.cart).await.unwrap();
    assert_eq!(confirmation.items.len(), 1);
    assert!(matches!(ctx.checkout.state(), CheckoutState::Success(_)));
    assert_eq!(backend.cart_of(&user_id).len(), 1);

    let errors: Vec<_> = ctx
        .notices()
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .collect();
    assert!(errors.is_empty());
}

#[tokio::test]
async fn test_rejected_order_stays_in_review_with_server_message() {
    let backend = FakeBackend::start().await;
    let lamp = backend.add_item("Desk Lamp", 60.0, 5);
    let (mut ctx, _) = logged_in(&backend).await;

    ctx.cart.add(&ItemId::new(lamp.as_str()), 1).await.unwrap();
    to_review(&mut ctx);
    ctx.notices();

    backend.fail_orders(Some((400, "Desk Lamp is out of stock")));
    let err = ctx.checkout.confirm_order(&mut ctx.cart).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Order { .. }));
    assert_eq!(err.to_string(), "Desk Lamp is out of stock");
    assert_eq!(ctx.checkout.state(), &CheckoutState::Review);

    backend.fail_orders(Some((400, "")));
    let err = ctx.checkout.confirm_order(&mut ctx.cart).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to place order. Please try again.");

    let notices = ctx.notices();
    assert_eq!(notices.len(), 2);
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));

    // Still possible once the backend recovers
    backend.fail_orders(None);
    ctx.checkout.confirm_order(&mut ctx.cart).await.unwrap();
}

#[tokio::test]
async fn test_empty_cart_place_order_makes_no_request() {
    let backend = FakeBackend::start().await;
    let (mut ctx, _) = logged_in(&backend).await;
    backend.clear_requests();

    let err = ctx.checkout.place_order(&ctx.cart).unwrap_err();
    assert_eq!(err.to_string(), "Your cart is empty");
    assert_eq!(ctx.checkout.state(), &CheckoutState::Cart);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_success_is_terminal() {
    let backend = FakeBackend::start().await;
    let lamp = backend.add_item("Desk Lamp", 60.0, 5);
    let (mut ctx, _) = logged_in(&backend).await;

    ctx.cart.add(&ItemId::new(lamp.as_str()), 1).await.unwrap();
    to_review(&mut ctx);
    ctx.checkout.confirm_order(&mut ctx.cart).await.unwrap();

    assert!(matches!(
        ctx.checkout.back(),
        Err(CheckoutError::InvalidTransition { from: "success", .. })
    ));
    assert!(matches!(
        ctx.checkout.submit_shipping(shipping()),
        Err(CheckoutError::InvalidTransition { .. })
    ));
    assert!(matches!(ctx.checkout.state(), CheckoutState::Success(_)));
    assert!(ctx.checkout.confirmation().is_some());
}
