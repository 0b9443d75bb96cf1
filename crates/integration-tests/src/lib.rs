//! Integration tests for Tastebud.
//!
//! Each test starts two servers on ephemeral localhost ports: a fake
//! restaurant backend answering the REST contract from canned data, and the
//! real storefront router pointed at it. Requests go through `reqwest` with
//! a cookie store, so the session cookie behaves as in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tastebud-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fake_backend;

use std::collections::HashMap;
use std::net::SocketAddr;

use reqwest::Client;
use serde_json::{Value, json};
use tastebud_storefront::config::StorefrontConfig;
use tastebud_storefront::state::AppState;

pub use fake_backend::{FakeBackend, PASSWORD};

/// A running storefront plus its fake backend.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub backend: FakeBackend,
}

/// Errors raised while wiring up a test context.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

impl TestContext {
    /// Start the fake backend and a storefront bound to it.
    ///
    /// # Errors
    ///
    /// Returns an error if either server cannot bind or the client cannot be built.
    pub async fn start() -> Result<Self, BoxError> {
        let backend = FakeBackend::start().await?;

        let vars: HashMap<&str, String> = HashMap::from([
            ("BACKEND_API_URL", backend.url()),
            ("BACKEND_CACHE_TTL_SECS", "60".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())?;
        let app = tastebud_storefront::app(AppState::new(config));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            storefront_url: format!("http://{addr}"),
            backend,
        })
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Log in as one of the fake backend's users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn login(&self, email: &str) -> Result<reqwest::Response, BoxError> {
        Ok(self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?)
    }

    /// Add one unit of a menu item to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_to_cart(
        &self,
        restaurant_id: i64,
        menu_item_id: i64,
    ) -> Result<reqwest::Response, BoxError> {
        Ok(self
            .client
            .post(self.url("/api/cart/items"))
            .json(&json!({ "restaurant_id": restaurant_id, "menu_item_id": menu_item_id }))
            .send()
            .await?)
    }

    /// Fetch the cart view.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn cart(&self) -> Result<Value, BoxError> {
        Ok(self
            .client
            .get(self.url("/api/cart"))
            .send()
            .await?
            .json()
            .await?)
    }
}
