//! Restaurant and menu route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tastebud_core::{MenuItem, Restaurant, RestaurantId};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Query parameters for the restaurant listing.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantQuery {
    /// Case-insensitive substring of the restaurant name.
    pub q: Option<String>,
    /// Cuisine filter; `all` disables it.
    pub cuisine: Option<String>,
}

/// Restaurant listing response.
#[derive(Debug, Serialize)]
pub struct RestaurantList {
    pub count: usize,
    pub restaurants: Vec<Restaurant>,
}

/// Menu response.
#[derive(Debug, Serialize)]
pub struct MenuView {
    pub restaurant_id: RestaurantId,
    pub items: Vec<MenuItem>,
}

/// List restaurants, filtered by name and cuisine.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> Result<Json<RestaurantList>> {
    let restaurants: Vec<Restaurant> = state
        .backend()
        .list_restaurants()
        .await?
        .into_iter()
        .filter(|r| r.matches(query.q.as_deref(), query.cuisine.as_deref()))
        .collect();

    Ok(Json(RestaurantList {
        count: restaurants.len(),
        restaurants,
    }))
}

/// Restaurant detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> Result<Json<Restaurant>> {
    Ok(Json(state.backend().get_restaurant(id).await?))
}

/// A restaurant's menu.
#[instrument(skip(state))]
pub async fn menu(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> Result<Json<MenuView>> {
    let items = state.backend().get_menu(id).await?;
    Ok(Json(MenuView {
        restaurant_id: id,
        items,
    }))
}
