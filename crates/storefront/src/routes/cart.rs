//! Cart route handlers.
//!
//! Each handler loads the session's [`CartStore`], applies one operation and
//! writes it back. Every mutation answers with the updated cart view.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tastebud_core::{
    CartLineItem, CartStore, MenuItemId, Price, PriceBreakdown, RestaurantId, RestaurantRef,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{load_cart, save_cart};
use crate::state::AppState;

/// One cart line as shown to the diner.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub item_id: MenuItemId,
    pub name: String,
    pub description: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartLineItem> for CartLineView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            item_id: line.item.id,
            name: line.item.name.clone(),
            description: line.item.description.clone(),
            unit_price: line.item.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub restaurant: Option<RestaurantRef>,
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub total: Price,
    pub pricing: PriceBreakdown,
}

impl CartView {
    fn new(cart: &CartStore, state: &AppState) -> Self {
        Self {
            restaurant: cart.restaurant().cloned(),
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            total: cart.total(),
            pricing: state.config().pricing.quote(cart),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub restaurant_id: RestaurantId,
    pub menu_item_id: MenuItemId,
}

/// Update quantity request body. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Cart count response.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::new(&cart, &state)))
}

/// Add one unit of a menu item.
///
/// The item is resolved from the restaurant's menu so the cart only ever
/// holds backend data. An item from another restaurant is answered with 409
/// and the cart is left as it was.
#[instrument(skip(state, session), fields(restaurant_id = %form.restaurant_id, item_id = %form.menu_item_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let menu = state.backend().get_menu(form.restaurant_id).await?;
    let item = menu
        .into_iter()
        .find(|item| item.id == form.menu_item_id)
        .ok_or_else(|| AppError::NotFound(format!("Menu item not found: {}", form.menu_item_id)))?;

    if !item.available {
        return Err(AppError::BadRequest(format!(
            "{} is currently unavailable",
            item.name
        )));
    }

    let mut cart = load_cart(&session).await?;

    // The name is only fetched to bind an empty cart
    let restaurant_name = match cart.restaurant() {
        Some(bound) => bound.name.clone(),
        None => state.backend().get_restaurant(item.restaurant_id).await?.name,
    };

    if let Err(conflict) = cart.add_item(&item, &restaurant_name) {
        tracing::info!(
            cart_restaurant = %conflict.cart_restaurant.id,
            "Rejected item from a different restaurant"
        );
        return Err(conflict.into());
    }

    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added item to cart",
        &[
            ("item_id", item.id.to_string()),
            ("restaurant_id", item.restaurant_id.to_string()),
        ],
    );

    Ok(Json(CartView::new(&cart, &state)))
}

/// Set a line's quantity.
#[instrument(skip(state, session, form), fields(quantity = form.quantity))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<MenuItemId>,
    Json(form): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(item_id, form.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::new(&cart, &state)))
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<MenuItemId>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(item_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::new(&cart, &state)))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Cleared cart", &[]);

    Ok(Json(CartView::new(&cart, &state)))
}

/// Badge count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.item_count(),
    }))
}
