//! In-process stand-in for the restaurant backend.
//!
//! Serves canned restaurants, menus, users and reports in the backend's
//! upper-case row format, and records every order body it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use serde_json::{Value, json};

/// Password accepted for every fake user.
pub const PASSWORD: &str = "correct-horse";

/// Customer account email.
pub const CUSTOMER_EMAIL: &str = "diner@example.com";
/// Investor (`admin`) account email.
pub const INVESTOR_EMAIL: &str = "investor@example.com";
/// Restaurant owner account email.
pub const OWNER_EMAIL: &str = "owner@example.com";

/// Order ID assigned to every created order.
pub const CREATED_ORDER_ID: i64 = 100;

/// Restaurant whose menu is served but whose detail endpoint answers 503.
pub const UNSTABLE_RESTAURANT_ID: i64 = 3;

/// Delivery address that makes order creation answer 500.
pub const FAILING_ADDRESS: &str = "fail";
/// Delivery address that makes order creation wait [`SLOW_ORDER_DELAY`].
pub const SLOW_ADDRESS: &str = "slow";
/// How long a [`SLOW_ADDRESS`] order takes.
pub const SLOW_ORDER_DELAY: Duration = Duration::from_millis(500);

/// A recorded `POST /api/orders/` call.
#[derive(Debug, Clone)]
pub struct RecordedOrder {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    orders: Arc<Mutex<Vec<RecordedOrder>>>,
}

/// Handle to a running fake backend.
pub struct FakeBackend {
    addr: SocketAddr,
    state: FakeState,
}

impl FakeBackend {
    /// Bind to an ephemeral port and serve in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind.
    pub async fn start() -> std::io::Result<Self> {
        let state = FakeState::default();
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state })
    }

    /// Base URL to configure as `BACKEND_API_URL`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Orders received so far.
    #[must_use]
    pub fn recorded_orders(&self) -> Vec<RecordedOrder> {
        self.state
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn router(state: FakeState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/restaurants/", get(restaurants))
        .route("/api/restaurants/{id}", get(restaurant))
        .route("/api/restaurants/{id}/menu", get(menu))
        .route("/api/orders/", post(create_order))
        .route("/api/users/{id}/orders", get(user_orders))
        .route("/api/reports/revenue", get(revenue))
        .with_state(state)
}

fn restaurant_rows() -> Vec<Value> {
    vec![
        json!({
            "RESTAURANT_ID": 1,
            "RESTAURANT_NAME": "Trattoria",
            "CUISINE": "Italian",
            "ADDRESS": "12 Via Roma",
            "OWNER_NAME": "owner"
        }),
        json!({
            "RESTAURANT_ID": 2,
            "RESTAURANT_NAME": "Seoul Kitchen",
            "CUISINE": "Korean",
            "ADDRESS": "3 Gangnam Ave",
            "OWNER_NAME": "owner"
        }),
    ]
}

fn menu_rows(restaurant_id: i64) -> Vec<Value> {
    match restaurant_id {
        1 => vec![
            json!({"MENU_ITEM_ID": 11, "RESTAURANT_ID": 1, "ITEM_NAME": "Margherita Pizza",
                   "ITEM_DESCRIP": "Fresh mozzarella, basil", "PRICE": "16.99"}),
            json!({"MENU_ITEM_ID": 12, "RESTAURANT_ID": 1, "ITEM_NAME": "Burrata",
                   "ITEM_DESCRIP": "Creamy burrata", "PRICE": "18.99"}),
            json!({"MENU_ITEM_ID": 13, "RESTAURANT_ID": 1, "ITEM_NAME": "Tiramisu",
                   "ITEM_DESCRIP": "Sold out today", "PRICE": "8.50", "AVAILABLE": 0}),
        ],
        // Rows without RESTAURANT_ID, as some backend queries return them
        2 => vec![
            json!({"MENU_ITEM_ID": 21, "ITEM_NAME": "Bibimbap",
                   "ITEM_DESCRIP": "Rice bowl", "PRICE": "14.50"}),
        ],
        UNSTABLE_RESTAURANT_ID => vec![
            json!({"MENU_ITEM_ID": 31, "RESTAURANT_ID": 3, "ITEM_NAME": "Pancakes",
                   "ITEM_DESCRIP": "Short stack", "PRICE": "9.00"}),
        ],
        _ => Vec::new(),
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "database": "connected"}))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let account = match email {
        CUSTOMER_EMAIL => Some((5, "customer")),
        INVESTOR_EMAIL => Some((9, "admin")),
        OWNER_EMAIL => Some((7, "owner")),
        _ => None,
    };

    match account {
        Some((user_id, role)) if password == PASSWORD => (
            StatusCode::OK,
            Json(json!({
                "access_token": format!("token-{user_id}"),
                "token_type": "bearer",
                "user_id": user_id,
                "role": role
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid email or password"})),
        ),
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == CUSTOMER_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Email already registered"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "message": "Account created successfully!", "user_id": 42})),
    )
}

async fn restaurants() -> Json<Value> {
    let rows = restaurant_rows();
    Json(json!({"success": true, "count": rows.len(), "restaurants": rows}))
}

async fn restaurant(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == UNSTABLE_RESTAURANT_ID {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"detail": "Database unavailable"})),
        );
    }

    restaurant_rows()
        .into_iter()
        .find(|row| row["RESTAURANT_ID"] == id)
        .map_or_else(
            || {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"detail": "Restaurant not found"})),
                )
            },
            |row| (StatusCode::OK, Json(json!({"success": true, "restaurant": row}))),
        )
}

async fn menu(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({"success": true, "restaurant_id": id, "menu_items": menu_rows(id)}))
}

async fn create_order(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    state
        .orders
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedOrder {
            authorization,
            body: body.clone(),
        });

    if body["DELIVERY_ADDRESS"] == SLOW_ADDRESS {
        tokio::time::sleep(SLOW_ORDER_DELAY).await;
    }

    if body["DELIVERY_ADDRESS"] == FAILING_ADDRESS {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Order processing failed due to a server error."})),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "ORDER_ID": CREATED_ORDER_ID,
            "USER_ID": 5,
            "RESTAURANT_ID": body["RESTAURANT_ID"],
            "TOTAL_AMOUNT": "33.98",
            "STATUS": "pending",
            "ORDER_DATE": "2025-03-14T18:30:00",
            "items": [],
            "delivery": {"DELIVERY_STATUS": "ASSIGNED"}
        })),
    )
}

async fn user_orders(Path(id): Path<i64>) -> Json<Value> {
    Json(json!([
        {"ORDER_ID": 1, "USER_ID": id, "RESTAURANT_ID": 1, "RESTAURANT_NAME": "Trattoria",
         "TOTAL_AMOUNT": "15.00", "STATUS": "delivered", "ORDER_DATE": "2025-01-01T10:00:00"},
        {"ORDER_ID": 2, "USER_ID": id, "RESTAURANT_ID": 2, "RESTAURANT_NAME": "Seoul Kitchen",
         "TOTAL_AMOUNT": "22.50", "STATUS": "preparing", "ORDER_DATE": "2025-02-01T10:00:00"}
    ]))
}

async fn revenue() -> Json<Value> {
    Json(json!([
        {"RESTAURANT_NAME": "Trattoria", "TOTAL_ORDERS": 10, "TOTAL_REVENUE": "250.00",
         "AVG_ORDER_VALUE": "25.00", "UNIQUE_CUSTOMERS": 2, "PLATFORM_COMMISSION": "25.00"},
        {"RESTAURANT_NAME": "Seoul Kitchen", "TOTAL_ORDERS": 30, "TOTAL_REVENUE": "450.00",
         "AVG_ORDER_VALUE": "15.00", "UNIQUE_CUSTOMERS": 2, "PLATFORM_COMMISSION": "45.00"}
    ]))
}
