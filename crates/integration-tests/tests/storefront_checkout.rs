//! Integration tests for checkout and order submission.

#![allow(clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use tastebud_integration_tests::fake_backend::{
    CREATED_ORDER_ID, CUSTOMER_EMAIL, FAILING_ADDRESS, SLOW_ADDRESS,
};
use tastebud_integration_tests::{BoxError, TestContext};

async fn submit(ctx: &TestContext, address: &str) -> Result<reqwest::Response, BoxError> {
    Ok(ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({ "delivery_address": address, "payment_method": "credit_card" }))
        .send()
        .await?)
}

// =============================================================================
// Quote
// =============================================================================

#[tokio::test]
async fn test_quote_adds_fees_to_subtotal() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.add_to_cart(1, 11).await?;
    ctx.add_to_cart(1, 11).await?;

    let quote: Value = ctx
        .client
        .get(ctx.url("/api/checkout"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(quote["item_count"], 2);
    assert_eq!(quote["restaurant"]["id"], 1);
    assert_eq!(quote["pricing"]["subtotal"]["amount"], "33.98");
    assert_eq!(quote["pricing"]["delivery_fee"]["amount"], "3.99");
    Ok(())
}

// =============================================================================
// Submit
// =============================================================================

#[tokio::test]
async fn test_checkout_requires_login() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.add_to_cart(1, 11).await?;

    let response = submit(&ctx, "1 Main St").await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(ctx.backend.recorded_orders().is_empty());

    let cart = ctx.cart().await?;
    assert_eq!(cart["item_count"], 1);
    Ok(())
}

#[tokio::test]
async fn test_checkout_submits_order_and_clears_cart() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.add_to_cart(1, 11).await?;
    ctx.add_to_cart(1, 11).await?;
    ctx.add_to_cart(1, 12).await?;
    assert_eq!(ctx.login(CUSTOMER_EMAIL).await?.status(), StatusCode::OK);

    // Cart survives login
    assert_eq!(ctx.cart().await?["item_count"], 3);

    let response = submit(&ctx, "  1 Main St  ").await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let receipt: Value = response.json().await?;
    assert_eq!(receipt["order"]["id"], CREATED_ORDER_ID);
    assert_eq!(receipt["quoted"]["subtotal"]["amount"], "52.97");

    let orders = ctx.backend.recorded_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].authorization.as_deref(), Some("Bearer token-5"));
    assert_eq!(
        orders[0].body,
        json!({
            "RESTAURANT_ID": 1,
            "PAYMENT_METHOD": "credit_card",
            "DELIVERY_ADDRESS": "1 Main St",
            "items": [
                { "MENU_ITEM_ID": 11, "QUANTITY": 2 },
                { "MENU_ITEM_ID": 12, "QUANTITY": 1 }
            ]
        })
    );

    let cart = ctx.cart().await?;
    assert_eq!(cart["item_count"], 0);
    assert!(cart["restaurant"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_blank_address_keeps_cart() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.add_to_cart(1, 11).await?;
    ctx.login(CUSTOMER_EMAIL).await?;

    let response = submit(&ctx, "   ").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.backend.recorded_orders().is_empty());
    assert_eq!(ctx.cart().await?["item_count"], 1);
    Ok(())
}

#[tokio::test]
async fn test_empty_cart_is_rejected() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.login(CUSTOMER_EMAIL).await?;

    let response = submit(&ctx, "1 Main St").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.backend.recorded_orders().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_backend_failure_keeps_cart() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.add_to_cart(1, 11).await?;
    ctx.login(CUSTOMER_EMAIL).await?;

    let response = submit(&ctx, FAILING_ADDRESS).await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(ctx.backend.recorded_orders().len(), 1);
    assert_eq!(ctx.cart().await?["item_count"], 1);

    // A retry after the failure is allowed
    let response = submit(&ctx, "1 Main St").await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_submit_is_rejected() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.add_to_cart(1, 11).await?;
    ctx.login(CUSTOMER_EMAIL).await?;

    // The backend holds the first order long enough for the second to arrive
    let (first, second) = tokio::join!(submit(&ctx, SLOW_ADDRESS), submit(&ctx, SLOW_ADDRESS));
    let mut statuses = [first?.status(), second?.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    assert_eq!(ctx.backend.recorded_orders().len(), 1);
    assert_eq!(ctx.cart().await?["item_count"], 0);

    // The gate is released once the first submission finishes
    ctx.add_to_cart(1, 12).await?;
    let response = submit(&ctx, "1 Main St").await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(())
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_wrong_password_is_unauthorized() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;

    let response = ctx
        .client
        .post(ctx.url("/api/auth/login"))
        .json(&json!({ "email": CUSTOMER_EMAIL, "password": "nope" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let me = ctx.client.get(ctx.url("/api/auth/me")).send().await?;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_login_and_logout() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    ctx.add_to_cart(1, 11).await?;
    ctx.login(CUSTOMER_EMAIL).await?;

    let me: Value = ctx
        .client
        .get(ctx.url("/api/auth/me"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["user_id"], 5);
    assert_eq!(me["role"], "customer");

    let response = ctx.client.post(ctx.url("/api/auth/logout")).send().await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = ctx.client.get(ctx.url("/api/auth/me")).send().await?;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.cart().await?["item_count"], 1);
    Ok(())
}

#[tokio::test]
async fn test_register_forwards_backend_errors() -> Result<(), BoxError> {
    let ctx = TestContext::start().await?;
    let form = |email: &str| {
        json!({
            "username": "newdiner",
            "email": email,
            "password": "hunter22",
            "phone": "555-0100"
        })
    };

    let response = ctx
        .client
        .post(ctx.url("/api/auth/register"))
        .json(&form("new@example.com"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .client
        .post(ctx.url("/api/auth/register"))
        .json(&form(CUSTOMER_EMAIL))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Email already registered");
    Ok(())
}
