//! Domain models for storefront.
//!
//! Everything here is session state; reference data and orders come from
//! `tastebud_core`.

pub mod session;

pub use session::{CurrentUser, keys as session_keys, load_cart, save_cart};
