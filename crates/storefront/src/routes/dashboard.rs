//! Role-gated dashboard route handlers.
//!
//! - Customer: own orders and spend summary (any signed-in user)
//! - Restaurant: restaurant, menu and backend metrics (owners and investors)
//! - Revenue: platform totals (investors only)

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tastebud_core::{
    MenuItem, Order, Restaurant, RestaurantId, RestaurantRevenue, RevenueSummary, SpendSummary,
    UserRole,
};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::routes::auth::MeResponse;
use crate::state::AppState;

/// Customer dashboard payload.
#[derive(Debug, Serialize)]
pub struct CustomerDashboard {
    pub user: MeResponse,
    pub summary: SpendSummary,
    pub recent_orders: Vec<Order>,
}

/// Restaurant dashboard payload.
#[derive(Debug, Serialize)]
pub struct RestaurantDashboard {
    pub restaurant: Restaurant,
    pub menu: Vec<MenuItem>,
    /// Backend-computed metrics, absent when the backend cannot supply them.
    pub metrics: Option<serde_json::Value>,
}

/// Revenue dashboard payload.
#[derive(Debug, Serialize)]
pub struct RevenueDashboard {
    pub summary: RevenueSummary,
    pub restaurants: Vec<RestaurantRevenue>,
    pub platform_metrics: Option<serde_json::Value>,
}

/// Optional date range for platform metrics.
#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Orders shown on the customer dashboard.
const RECENT_ORDER_LIMIT: usize = 5;

/// The signed-in user's order summary.
#[instrument(skip(state, auth), fields(user_id = %auth.user.id))]
pub async fn customer(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<CustomerDashboard>> {
    let mut orders = state.backend().user_orders(&auth.token, auth.user.id).await;
    let summary = SpendSummary::from_orders(&orders);

    orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
    orders.truncate(RECENT_ORDER_LIMIT);

    Ok(Json(CustomerDashboard {
        user: auth.user.into(),
        summary,
        recent_orders: orders,
    }))
}

/// One restaurant's dashboard.
#[instrument(skip(state, auth), fields(user_id = %auth.user.id))]
pub async fn restaurant(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<RestaurantId>,
) -> Result<Json<RestaurantDashboard>> {
    auth.require_role(UserRole::can_view_restaurant_dashboard, "Restaurant dashboard")?;

    let backend = state.backend();
    let (restaurant, menu, metrics) = tokio::join!(
        backend.get_restaurant(id),
        backend.get_menu(id),
        backend.restaurant_dashboard(&auth.token, id),
    );

    Ok(Json(RestaurantDashboard {
        restaurant: restaurant?,
        menu: menu?,
        metrics,
    }))
}

/// Platform revenue.
#[instrument(skip(state, auth), fields(user_id = %auth.user.id))]
pub async fn revenue(
    State(state): State<AppState>,
    auth: RequireAuth,
    Query(range): Query<RevenueQuery>,
) -> Result<Json<RevenueDashboard>> {
    auth.require_role(UserRole::can_view_revenue, "Revenue dashboard")?;

    let backend = state.backend();
    let (rows, platform_metrics) = tokio::join!(
        backend.revenue_report(&auth.token),
        backend.platform_metrics(&auth.token, range.start_date, range.end_date),
    );
    let rows = rows?;

    Ok(Json(RevenueDashboard {
        summary: RevenueSummary::from_rows(&rows, state.config().platform_fees),
        restaurants: rows,
        platform_metrics,
    }))
}
