//! Conversions from backend wire rows to core types.
//!
//! A row missing a required column is rejected with
//! [`BackendError::InvalidData`] instead of being filled with a placeholder.

use rust_decimal::Decimal;
use tastebud_core::{
    Delivery, MenuItem, MenuItemId, Order, OrderId, OrderItem, OrderStatus, Price, Restaurant,
    RestaurantId, RestaurantRevenue, UserId, parse_backend_timestamp,
};

use super::BackendError;
use super::types::{DeliveryRow, MenuRow, OrderItemRow, OrderRow, RestaurantRow, RevenueRow};

fn required<T>(value: Option<T>, column: &str, row: &str) -> Result<T, BackendError> {
    value.ok_or_else(|| BackendError::InvalidData(format!("{row} row is missing {column}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn non_negative(amount: Decimal, column: &str) -> Result<Decimal, BackendError> {
    if amount.is_sign_negative() {
        return Err(BackendError::InvalidData(format!(
            "{column} must not be negative"
        )));
    }
    Ok(amount)
}

pub fn convert_restaurant(row: RestaurantRow) -> Result<Restaurant, BackendError> {
    let id = required(row.restaurant_id, "RESTAURANT_ID", "restaurant")?;
    let name = required(non_blank(row.restaurant_name), "RESTAURANT_NAME", "restaurant")?;

    Ok(Restaurant {
        id: RestaurantId::new(id),
        name,
        cuisine: non_blank(row.cuisine),
        address: non_blank(row.address),
        owner_name: non_blank(row.owner_name),
        rating: row.rating.filter(|r| r.is_finite()),
    })
}

/// Convert a menu row; rows without a restaurant id belong to `restaurant_id`.
pub fn convert_menu_item(
    row: MenuRow,
    restaurant_id: RestaurantId,
) -> Result<MenuItem, BackendError> {
    let id = required(row.menu_item_id, "MENU_ITEM_ID", "menu")?;
    let name = required(non_blank(row.item_name), "ITEM_NAME", "menu")?;
    let price = non_negative(required(row.price, "PRICE", "menu")?, "PRICE")?;

    Ok(MenuItem {
        id: MenuItemId::new(id),
        restaurant_id: row.restaurant_id.map_or(restaurant_id, RestaurantId::new),
        name,
        description: row.item_descrip.unwrap_or_default(),
        price: Price::usd(price),
        category: non_blank(row.category),
        available: row.available.as_ref().is_none_or(truthy),
    })
}

fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !matches!(s.trim(), "" | "0" | "false" | "FALSE"),
        serde_json::Value::Null => true,
        _ => false,
    }
}

pub fn convert_order(row: OrderRow) -> Result<Order, BackendError> {
    let id = required(row.order_id, "ORDER_ID", "order")?;
    let total = non_negative(row.total_amount.unwrap_or_default(), "TOTAL_AMOUNT")?;

    let items = row
        .items
        .into_iter()
        .map(convert_order_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Order {
        id: OrderId::new(id),
        user_id: row.user_id.map(UserId::new),
        restaurant_id: row.restaurant_id.map(RestaurantId::new),
        restaurant_name: non_blank(row.restaurant_name),
        total_amount: Price::usd(total),
        status: row
            .status
            .as_deref()
            .map_or(OrderStatus::Pending, OrderStatus::parse),
        ordered_at: row.order_date.as_deref().and_then(parse_backend_timestamp),
        items,
        delivery: row.delivery.map(convert_delivery),
    })
}

fn convert_order_item(row: OrderItemRow) -> Result<OrderItem, BackendError> {
    let menu_item_id = required(row.menu_item_id, "MENU_ITEM_ID", "order item")?;
    let quantity = required(row.quantity, "QUANTITY", "order item")?;
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| BackendError::InvalidData(format!("invalid QUANTITY {quantity}")))?;

    Ok(OrderItem {
        menu_item_id: MenuItemId::new(menu_item_id),
        name: row.item_name.unwrap_or_default(),
        description: non_blank(row.item_descrip),
        quantity,
        unit_price: Price::usd(row.price.unwrap_or_default()),
    })
}

fn convert_delivery(row: DeliveryRow) -> Delivery {
    Delivery {
        status: row.delivery_status.unwrap_or_default(),
        estimated_at: row.estimated_time.as_deref().and_then(parse_backend_timestamp),
        delivered_at: row.actual_time.as_deref().and_then(parse_backend_timestamp),
    }
}

pub fn convert_revenue_row(row: RevenueRow) -> Result<RestaurantRevenue, BackendError> {
    Ok(RestaurantRevenue {
        restaurant_name: required(non_blank(row.restaurant_name), "RESTAURANT_NAME", "revenue")?,
        total_orders: row.total_orders.unwrap_or_default(),
        total_revenue: row.total_revenue.unwrap_or_default(),
        avg_order_value: row.avg_order_value.unwrap_or_default(),
        unique_customers: row.unique_customers.unwrap_or_default(),
        platform_commission: row.platform_commission.unwrap_or_default(),
    })
}
