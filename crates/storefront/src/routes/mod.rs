//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Liveness
//! GET    /health/ready                   - Backend readiness probe
//!
//! # Restaurants
//! GET    /api/restaurants                - Listing (?q=&cuisine=)
//! GET    /api/restaurants/{id}           - Restaurant detail
//! GET    /api/restaurants/{id}/menu      - Menu
//!
//! # Cart (session-backed)
//! GET    /api/cart                       - Cart view
//! POST   /api/cart/items                 - Add one unit (409 on another restaurant)
//! PATCH  /api/cart/items/{item_id}       - Set quantity (<= 0 removes)
//! DELETE /api/cart/items/{item_id}       - Remove line
//! DELETE /api/cart                       - Clear
//! GET    /api/cart/count                 - Item count badge
//!
//! # Checkout
//! GET    /api/checkout                   - Price breakdown
//! POST   /api/checkout                   - Place order (requires auth)
//!
//! # Auth
//! POST   /api/auth/register              - Create account
//! POST   /api/auth/login                 - Log in
//! POST   /api/auth/logout                - Log out
//! GET    /api/auth/me                    - Current identity
//!
//! # Orders (requires auth)
//! GET    /api/orders                     - Order history
//! GET    /api/orders/{id}                - Order detail
//!
//! # Dashboards (requires auth)
//! GET    /api/dashboard/customer         - Spend summary
//! GET    /api/dashboard/restaurant/{id}  - Owners and investors
//! GET    /api/dashboard/revenue          - Investors only
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod restaurants;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the restaurant routes router.
pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(restaurants::index))
        .route("/{id}", get(restaurants::show))
        .route("/{id}/menu", get(restaurants::menu))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{item_id}",
            patch(cart::update).delete(cart::remove),
        )
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/customer", get(dashboard::customer))
        .route("/restaurant/{id}", get(dashboard::restaurant))
        .route("/revenue", get(dashboard::revenue))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/restaurants", restaurant_routes())
        .nest("/api/cart", cart_routes())
        .route(
            "/api/checkout",
            get(checkout::quote).post(checkout::submit),
        )
        .nest("/api/auth", auth_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/dashboard", dashboard_routes())
}
