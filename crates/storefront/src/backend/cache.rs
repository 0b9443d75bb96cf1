//! Cache types for backend reference data.

use tastebud_core::{MenuItem, Restaurant, RestaurantId};

/// Cache key for restaurants and menus.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Restaurants,
    Restaurant(RestaurantId),
    Menu(RestaurantId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Restaurants(Vec<Restaurant>),
    Restaurant(Box<Restaurant>),
    Menu(Vec<MenuItem>),
}
