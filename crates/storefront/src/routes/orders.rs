//! Order history route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tastebud_core::{Order, OrderId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order history response.
#[derive(Debug, Serialize)]
pub struct OrderList {
    pub count: usize,
    pub orders: Vec<Order>,
}

/// The signed-in user's orders, newest first.
#[instrument(skip(state, auth), fields(user_id = %auth.user.id))]
pub async fn index(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<OrderList>> {
    let orders = state.backend().user_orders(&auth.token, auth.user.id).await;
    Ok(Json(OrderList {
        count: orders.len(),
        orders,
    }))
}

/// One order. Diners only see their own; investors see any.
#[instrument(skip(state, auth), fields(user_id = %auth.user.id))]
pub async fn show(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.backend().get_order(&auth.token, id).await?;

    let owned = order.user_id.is_none_or(|owner| owner == auth.user.id);
    if !owned && !auth.user.role.can_view_revenue() {
        return Err(AppError::NotFound(format!("Order not found: {id}")));
    }

    Ok(Json(order))
}
