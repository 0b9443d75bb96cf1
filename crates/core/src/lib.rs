//! Tastebud Core - Shared types and cart logic.
//!
//! This crate provides the domain model used by the Tastebud storefront:
//! - [`types`] - Newtype IDs, prices, roles, and restaurant/menu reference data
//! - [`cart`] - The single-restaurant [`CartStore`]
//! - [`checkout`] - Display pricing and order drafting for checkout
//! - [`revenue`] - Revenue analytics for the role-gated dashboards
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Every cart mutation is a synchronous operation on an owned
//! value, so the same code runs unchanged in request handlers and tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod revenue;
pub mod types;

pub use cart::{CartLineItem, CartRestoreError, CartStore, DifferentRestaurant, OrderLine};
pub use checkout::{CheckoutError, CheckoutForm, OrderDraft, PriceBreakdown, PricingPolicy};
pub use revenue::{PlatformFees, RestaurantRevenue, RevenueSummary, SpendSummary};
pub use types::*;
