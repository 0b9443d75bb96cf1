//! Restaurant backend REST API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for restaurants, menus, users and
//!   orders; the storefront holds no copy beyond a short-lived cache
//! - Reference data (restaurant list, restaurant, menu) is cached in `moka`
//! - Wire rows use the backend's upper-case column names and are converted
//!   to `tastebud_core` types at this boundary
//!
//! # Example
//!
//! ```rust,ignore
//! use tastebud_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//! let menu = client.get_menu(RestaurantId::new(7)).await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod types;

pub use client::BackendClient;
pub use types::{AuthToken, LoginRequest, RegisterResponse};

use reqwest::StatusCode;
use thiserror::Error;

/// Detail reported when an error body carries no usable message.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {detail}")]
    Api { status: StatusCode, detail: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A row was missing a required field or carried an invalid value.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// Whether the failure lies with the backend or the network rather than
    /// the request the storefront sent.
    #[must_use]
    pub fn is_server_side(&self) -> bool {
        match self {
            Self::Http(_) | Self::InvalidData(_) | Self::Parse(_) => true,
            Self::Api { status, .. } => status.is_server_error(),
            Self::NotFound(_) => false,
        }
    }
}
