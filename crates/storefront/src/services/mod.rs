//! Storefront services that sit between handlers and the backend client.

pub mod checkout;

pub use checkout::{CheckoutGate, CheckoutPermit};
