//! Core types for Tastebud.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account;
pub mod id;
pub mod menu;
pub mod order;
pub mod price;
pub mod status;

pub use account::{Email, EmailError, Registration, RegistrationError};
pub use id::*;
pub use menu::{MenuItem, Restaurant, RestaurantRef};
pub use order::{Delivery, Order, OrderItem, parse_backend_timestamp};
pub use price::{CurrencyCode, Price};
pub use status::*;
