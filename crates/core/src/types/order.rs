//! Placed orders as reported by the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MenuItemId, OrderId, RestaurantId, UserId};
use super::price::Price;
use super::status::{DeliveryStatus, OrderStatus};

/// One line of a placed order, priced by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
}

/// Delivery assigned to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub status: DeliveryStatus,
    pub estimated_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant_name: Option<String>,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub ordered_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
    pub delivery: Option<Delivery>,
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and also naive `YYYY-MM-DDTHH:MM:SS[.f]` or
/// `YYYY-MM-DD HH:MM:SS` values, which the backend emits in UTC without an
/// offset.
#[must_use]
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let dt = parse_backend_timestamp("2025-03-14T18:30:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 3, 14));
        assert_eq!(dt.hour(), 18);

        let spaced = parse_backend_timestamp("2025-03-14 18:30:00").unwrap();
        assert_eq!(spaced, dt);
    }

    #[test]
    fn test_parse_rfc3339_converts_offset() {
        let dt = parse_backend_timestamp("2025-03-14T20:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 18);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_backend_timestamp("yesterday").is_none());
    }
}
