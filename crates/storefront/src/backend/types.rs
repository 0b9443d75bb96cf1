//! Wire types for the backend REST API.
//!
//! Rows mirror the backend's database columns, so field names are the
//! upper-case column names. Every field is optional on the wire; required
//! fields are enforced when rows are converted to core types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tastebud_core::{DeliveryStatus, OrderDraft, UserRole};

// =============================================================================
// Health
// =============================================================================

/// `GET /api/health` response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthResponse {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

// =============================================================================
// Auth
// =============================================================================

/// `POST /api/auth/login` request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register` request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: &'a str,
    pub role: &'static str,
}

/// `POST /api/auth/register` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// `POST /api/auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user_id: i64,
    pub role: UserRole,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// =============================================================================
// Restaurants & Menus
// =============================================================================

/// `GET /api/restaurants/` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantsEnvelope {
    #[serde(default)]
    pub restaurants: Vec<RestaurantRow>,
}

/// `GET /api/restaurants/{id}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantEnvelope {
    pub restaurant: Option<RestaurantRow>,
}

/// `GET /api/restaurants/{id}/menu` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuEnvelope {
    #[serde(default)]
    pub menu_items: Vec<MenuRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RestaurantRow {
    pub restaurant_id: Option<i64>,
    pub restaurant_name: Option<String>,
    #[serde(alias = "CUISINE_TYPE")]
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub owner_name: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MenuRow {
    pub menu_item_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub item_name: Option<String>,
    pub item_descrip: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    /// MySQL reports booleans as 0/1, so accept either.
    #[serde(alias = "IS_AVAILABLE")]
    pub available: Option<serde_json::Value>,
}

// =============================================================================
// Orders
// =============================================================================

/// `POST /api/orders/` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CreateOrderRequest {
    pub restaurant_id: i64,
    pub payment_method: &'static str,
    pub delivery_address: String,
    #[serde(rename = "items")]
    pub items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CreateOrderItem {
    pub menu_item_id: i64,
    pub quantity: u32,
}

impl From<&OrderDraft> for CreateOrderRequest {
    fn from(draft: &OrderDraft) -> Self {
        Self {
            restaurant_id: draft.restaurant_id.as_i64(),
            payment_method: draft.payment_method.as_str(),
            delivery_address: draft.delivery_address.clone(),
            items: draft
                .items
                .iter()
                .map(|line| CreateOrderItem {
                    menu_item_id: line.item_id.as_i64(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OrderRow {
    pub order_id: Option<i64>,
    pub user_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub restaurant_name: Option<String>,
    pub total_amount: Option<Decimal>,
    #[serde(alias = "ORDER_STATUS")]
    pub status: Option<String>,
    pub order_date: Option<String>,
    #[serde(rename = "items", default)]
    pub items: Vec<OrderItemRow>,
    #[serde(rename = "delivery", default)]
    pub delivery: Option<DeliveryRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OrderItemRow {
    pub menu_item_id: Option<i64>,
    pub item_name: Option<String>,
    pub item_descrip: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DeliveryRow {
    #[serde(alias = "STATUS")]
    pub delivery_status: Option<DeliveryStatus>,
    #[serde(alias = "ESTIMATED_DELIVERY_TIME")]
    pub estimated_time: Option<String>,
    pub actual_time: Option<String>,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RevenueRow {
    pub restaurant_name: Option<String>,
    pub total_orders: Option<u64>,
    pub total_revenue: Option<Decimal>,
    pub avg_order_value: Option<Decimal>,
    pub unique_customers: Option<u64>,
    pub platform_commission: Option<Decimal>,
}

/// Error body shape returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human readable detail; validation errors arrive as a list of objects.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(errors) => errors
                .iter()
                .find_map(|e| e.get("msg").and_then(serde_json::Value::as_str))
                .map(String::from),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tastebud_core::{
        CartStore, CheckoutForm, MenuItem, MenuItemId, PaymentMethod, Price, RestaurantId,
    };

    use super::*;

    #[test]
    fn test_create_order_body_shape() {
        let mut cart = CartStore::new();
        let item = MenuItem {
            id: MenuItemId::new(11),
            restaurant_id: RestaurantId::new(3),
            name: "Margherita Pizza".to_string(),
            description: "Fresh mozzarella, basil".to_string(),
            price: Price::usd(Decimal::new(1699, 2)),
            category: None,
            available: true,
        };
        cart.add_item(&item, "Trattoria").unwrap();
        cart.add_item(&item, "Trattoria").unwrap();

        let form = CheckoutForm {
            delivery_address: " 1 Main St ".to_string(),
            payment_method: PaymentMethod::CreditCard,
        };
        let draft = OrderDraft::from_cart(&cart, &form).unwrap();
        let body = serde_json::to_value(CreateOrderRequest::from(&draft)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "RESTAURANT_ID": 3,
                "PAYMENT_METHOD": "credit_card",
                "DELIVERY_ADDRESS": "1 Main St",
                "items": [{"MENU_ITEM_ID": 11, "QUANTITY": 2}]
            })
        );
    }

    #[test]
    fn test_menu_row_accepts_float_price() {
        let row: MenuRow = serde_json::from_value(serde_json::json!({
            "MENU_ITEM_ID": 1,
            "RESTAURANT_ID": 2,
            "ITEM_NAME": "Burrata",
            "ITEM_DESCRIP": "Creamy burrata",
            "PRICE": 18.99
        }))
        .unwrap();
        assert_eq!(row.price, Some(Decimal::new(1899, 2)));
        assert!(row.available.is_none());
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Email already registered"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Email already registered"));

        let body: ErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("field required"));
    }

    #[test]
    fn test_auth_token_maps_backend_roles() {
        let token: AuthToken = serde_json::from_str(
            r#"{"access_token":"t","token_type":"bearer","user_id":5,"role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(token.role, UserRole::Investor);
    }
}
