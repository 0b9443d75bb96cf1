//! Checkout route handlers.
//!
//! Pricing shown here is for display; the backend prices the submitted order
//! itself.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Serialize;
use tastebud_core::{CheckoutForm, Order, OrderDraft, PriceBreakdown, RestaurantRef};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{load_cart, save_cart};
use crate::state::AppState;

/// Checkout summary for the current cart.
#[derive(Debug, Serialize)]
pub struct CheckoutQuote {
    pub restaurant: Option<RestaurantRef>,
    pub item_count: u64,
    pub pricing: PriceBreakdown,
}

/// Result of a successful checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    pub order: Order,
    /// The breakdown the diner saw when submitting.
    pub quoted: PriceBreakdown,
}

/// Price breakdown for the current cart.
#[instrument(skip(state, session))]
pub async fn quote(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutQuote>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CheckoutQuote {
        restaurant: cart.restaurant().cloned(),
        item_count: cart.item_count(),
        pricing: state.config().pricing.quote(&cart),
    }))
}

/// Submit the cart as an order.
///
/// Only one submission per session may be in flight; a second is answered
/// with 409. The cart is cleared only once the backend accepts the order.
#[instrument(skip(state, session, auth, form), fields(user_id = %auth.user.id, payment_method = %form.payment_method))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    auth: RequireAuth,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<CheckoutReceipt>)> {
    let session_id = session
        .id()
        .ok_or_else(|| AppError::Unauthorized("Sign in required".to_string()))?;

    let _permit = state
        .checkout_gate()
        .try_acquire(session_id)
        .ok_or_else(|| AppError::Conflict("A checkout is already in progress".to_string()))?;

    let mut cart = load_cart(&session).await?;
    let draft = OrderDraft::from_cart(&cart, &form)?;
    let quoted = state.config().pricing.quote(&cart);

    let order = state.backend().create_order(&auth.token, &draft).await?;

    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(order_id = %order.id, "Order placed");
    add_breadcrumb(
        "checkout",
        "Order placed",
        &[
            ("order_id", order.id.to_string()),
            ("restaurant_id", draft.restaurant_id.to_string()),
        ],
    );

    Ok((StatusCode::CREATED, Json(CheckoutReceipt { order, quoted })))
}
