//! Status enums for users, orders, deliveries, and payments.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Platform role of a signed-in user.
///
/// The backend stores `owner` and `admin`; the storefront calls the same
/// roles `restaurant_owner` and `investor`. Both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    #[serde(alias = "CUSTOMER")]
    Customer,
    #[serde(alias = "owner", alias = "OWNER")]
    RestaurantOwner,
    #[serde(alias = "DRIVER")]
    Driver,
    #[serde(alias = "admin", alias = "ADMIN")]
    Investor,
}

impl UserRole {
    /// Role name as the storefront spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::RestaurantOwner => "restaurant_owner",
            Self::Driver => "driver",
            Self::Investor => "investor",
        }
    }

    /// Role name as the backend stores it.
    #[must_use]
    pub const fn backend_name(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::RestaurantOwner => "owner",
            Self::Driver => "driver",
            Self::Investor => "admin",
        }
    }

    /// Restaurant dashboards are visible to owners and investors.
    #[must_use]
    pub const fn can_view_restaurant_dashboard(self) -> bool {
        matches!(self, Self::RestaurantOwner | Self::Investor)
    }

    /// Platform revenue is investor-only.
    #[must_use]
    pub const fn can_view_revenue(self) -> bool {
        matches!(self, Self::Investor)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status.
///
/// Unknown values from the backend are read as [`OrderStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Parse a status name in either case, falling back to `Pending`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "preparing" => Self::Preparing,
            "out_for_delivery" => Self::OutForDelivery,
            "delivered" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    /// Whether the order can still change.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Delivery status as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    #[default]
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Failed,
}

/// Payment method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Cash,
    DigitalWallet,
}

impl PaymentMethod {
    /// Wire name sent to the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Cash => "cash",
            Self::DigitalWallet => "digital_wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_accepts_backend_aliases() {
        let owner: UserRole = serde_json::from_str(r#""owner""#).unwrap();
        assert_eq!(owner, UserRole::RestaurantOwner);

        let admin: UserRole = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(admin, UserRole::Investor);

        let investor: UserRole = serde_json::from_str(r#""investor""#).unwrap();
        assert_eq!(investor, UserRole::Investor);
        assert_eq!(serde_json::to_string(&investor).unwrap(), r#""investor""#);
        assert_eq!(investor.backend_name(), "admin");
    }

    #[test]
    fn test_user_role_permissions() {
        assert!(!UserRole::Customer.can_view_restaurant_dashboard());
        assert!(UserRole::RestaurantOwner.can_view_restaurant_dashboard());
        assert!(!UserRole::RestaurantOwner.can_view_revenue());
        assert!(UserRole::Investor.can_view_revenue());
        assert!(!UserRole::Driver.can_view_revenue());
    }

    #[test]
    fn test_order_status_unknown_falls_back_to_pending() {
        let status: OrderStatus = serde_json::from_str(r#""on_hold""#).unwrap();
        assert_eq!(status, OrderStatus::Pending);

        let status: OrderStatus = serde_json::from_str(r#""OUT_FOR_DELIVERY""#).unwrap();
        assert_eq!(status, OrderStatus::OutForDelivery);
        assert!(status.is_active());
        assert!(!OrderStatus::Delivered.is_active());
    }

    #[test]
    fn test_delivery_status_wire_format() {
        let status: DeliveryStatus = serde_json::from_str(r#""PICKED_UP""#).unwrap();
        assert_eq!(status, DeliveryStatus::PickedUp);
    }

    #[test]
    fn test_payment_method_wire_name() {
        assert_eq!(PaymentMethod::DigitalWallet.to_string(), "digital_wallet");
        let method: PaymentMethod = serde_json::from_str(r#""cash""#).unwrap();
        assert_eq!(method, PaymentMethod::Cash);
    }
}
