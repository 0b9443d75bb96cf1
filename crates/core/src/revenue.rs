//! Revenue analytics for the dashboards.
//!
//! The backend aggregates completed orders per restaurant; this module turns
//! those rows into platform totals for investors and a spend summary for
//! customers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Order, Price};

/// One restaurant's row of the revenue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRevenue {
    pub restaurant_name: String,
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub avg_order_value: Decimal,
    pub unique_customers: u64,
    pub platform_commission: Decimal,
}

/// Per-order fees the platform keeps on top of its commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformFees {
    pub service_fee_per_order: Decimal,
    pub delivery_commission_per_order: Decimal,
}

impl Default for PlatformFees {
    fn default() -> Self {
        Self {
            service_fee_per_order: Decimal::new(299, 2),
            delivery_commission_per_order: Decimal::new(60, 2),
        }
    }
}

/// Platform-wide totals across every restaurant row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueSummary {
    pub restaurants: usize,
    pub total_orders: u64,
    pub total_revenue: Price,
    pub avg_order_value: Price,
    pub unique_customers: u64,
    pub platform_commission: Price,
    pub service_fee_revenue: Price,
    pub delivery_commission_revenue: Price,
    pub total_platform_revenue: Price,
}

impl RevenueSummary {
    /// Aggregate report rows.
    ///
    /// Unique customers are summed per restaurant, so a diner who ordered
    /// from two restaurants counts twice.
    #[must_use]
    pub fn from_rows(rows: &[RestaurantRevenue], fees: PlatformFees) -> Self {
        let total_orders: u64 = rows.iter().map(|r| r.total_orders).sum();
        let total_revenue: Decimal = rows.iter().map(|r| r.total_revenue).sum();
        let commission: Decimal = rows.iter().map(|r| r.platform_commission).sum();
        let orders = Decimal::from(total_orders);

        let avg_order_value = if total_orders == 0 {
            Decimal::ZERO
        } else {
            total_revenue / orders
        };
        let service_fee_revenue = orders * fees.service_fee_per_order;
        let delivery_commission_revenue = orders * fees.delivery_commission_per_order;

        Self {
            restaurants: rows.len(),
            total_orders,
            total_revenue: Price::usd(total_revenue),
            avg_order_value: Price::usd(avg_order_value),
            unique_customers: rows.iter().map(|r| r.unique_customers).sum(),
            platform_commission: Price::usd(commission),
            service_fee_revenue: Price::usd(service_fee_revenue),
            delivery_commission_revenue: Price::usd(delivery_commission_revenue),
            total_platform_revenue: Price::usd(
                commission + service_fee_revenue + delivery_commission_revenue,
            ),
        }
    }
}

/// A customer's order history at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendSummary {
    pub order_count: usize,
    pub active_orders: usize,
    pub total_spent: Price,
    pub last_ordered_at: Option<DateTime<Utc>>,
}

impl SpendSummary {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            order_count: orders.len(),
            active_orders: orders.iter().filter(|o| o.status.is_active()).count(),
            total_spent: orders.iter().map(|o| o.total_amount).sum(),
            last_ordered_at: orders.iter().filter_map(|o| o.ordered_at).max(),
        }
    }
}
