//! Backend REST client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP. Caches restaurants and menus using `moka`
//! (TTL from [`BackendConfig::cache_ttl`]).

use std::sync::Arc;

use chrono::NaiveDate;
use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tastebud_core::{
    MenuItem, Order, OrderDraft, OrderId, Registration, Restaurant, RestaurantId,
    RestaurantRevenue, UserId,
};
use tracing::{debug, instrument, warn};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::conversions::{
    convert_menu_item, convert_order, convert_restaurant, convert_revenue_row,
};
use super::types::{
    AuthToken, CreateOrderRequest, ErrorBody, HealthResponse, LoginRequest, MenuEnvelope,
    OrderRow, RegisterRequest, RegisterResponse, RestaurantEnvelope, RestaurantsEnvelope,
    RevenueRow,
};
use super::{BackendError, GENERIC_FAILURE};
use crate::config::BackendConfig;

/// Longest slice of a response body echoed into logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the restaurant backend REST API.
///
/// Cloning is cheap; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Build an absolute URL for an API path such as `/api/health`.
    fn url(&self, path: &str) -> Result<Url, BackendError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|e| BackendError::InvalidData(format!("bad request URL {path}: {e}")))
    }

    /// Send a request and decode a JSON response.
    async fn execute<T, B>(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self
            .inner
            .client
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&response_text)
                .ok()
                .and_then(|body| body.message())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());

            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    body = %response_text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                    "Backend returned server error"
                );
            } else {
                debug!(status = %status, detail = %detail, "Backend rejected request");
            }
            return Err(BackendError::Api { status, detail });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, BackendError> {
        let url = self.url(path)?;
        self.execute::<T, ()>(Method::GET, url, token, None).await
    }

    async fn post<T, B>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        self.execute(Method::POST, url, token, Some(body)).await
    }

    // =========================================================================
    // Health & Auth
    // =========================================================================

    /// Probe the backend and its database.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or reports a failure.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthResponse, BackendError> {
        self.get("/api/health", None).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` when the backend refuses the account
    /// (for example, a duplicate email).
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegisterResponse, BackendError> {
        let body = RegisterRequest {
            username: &registration.username,
            email: registration.email.as_str(),
            password: &registration.password,
            phone: &registration.phone,
            role: registration.role.backend_name(),
        };
        self.post("/api/auth/register", None, &body).await
    }

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with status 401 for bad credentials.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthToken, BackendError> {
        self.post("/api/auth/login", None, credentials).await
    }

    // =========================================================================
    // Restaurant & Menu Methods
    // =========================================================================

    /// List every restaurant. Rows that fail validation are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, BackendError> {
        if let Some(CacheValue::Restaurants(restaurants)) =
            self.inner.cache.get(&CacheKey::Restaurants).await
        {
            debug!("Cache hit for restaurants");
            return Ok(restaurants);
        }

        let envelope: RestaurantsEnvelope = self.get("/api/restaurants/", None).await?;
        let restaurants: Vec<Restaurant> = envelope
            .restaurants
            .into_iter()
            .filter_map(|row| {
                convert_restaurant(row)
                    .inspect_err(|e| warn!(error = %e, "Skipping invalid restaurant row"))
                    .ok()
            })
            .collect();

        self.inner
            .cache
            .insert(
                CacheKey::Restaurants,
                CacheValue::Restaurants(restaurants.clone()),
            )
            .await;

        Ok(restaurants)
    }

    /// Get one restaurant.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the backend has no such restaurant.
    #[instrument(skip(self), fields(restaurant_id = %id))]
    pub async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant, BackendError> {
        let cache_key = CacheKey::Restaurant(id);

        if let Some(CacheValue::Restaurant(restaurant)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for restaurant");
            return Ok(*restaurant);
        }

        let envelope: RestaurantEnvelope = self
            .get(&format!("/api/restaurants/{id}"), None)
            .await
            .map_err(|e| not_found(e, || format!("Restaurant not found: {id}")))?;

        let row = envelope
            .restaurant
            .ok_or_else(|| BackendError::NotFound(format!("Restaurant not found: {id}")))?;
        let restaurant = convert_restaurant(row)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Restaurant(Box::new(restaurant.clone())))
            .await;

        Ok(restaurant)
    }

    /// Get a restaurant's menu.
    ///
    /// Rows without a restaurant id are attributed to `id`; rows that fail
    /// validation are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(restaurant_id = %id))]
    pub async fn get_menu(&self, id: RestaurantId) -> Result<Vec<MenuItem>, BackendError> {
        let cache_key = CacheKey::Menu(id);

        if let Some(CacheValue::Menu(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu");
            return Ok(items);
        }

        let envelope: MenuEnvelope = self
            .get(&format!("/api/restaurants/{id}/menu"), None)
            .await
            .map_err(|e| not_found(e, || format!("Restaurant not found: {id}")))?;

        let items: Vec<MenuItem> = envelope
            .menu_items
            .into_iter()
            .filter_map(|row| {
                convert_menu_item(row, id)
                    .inspect_err(|e| warn!(error = %e, "Skipping invalid menu row"))
                    .ok()
            })
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Menu(items.clone()))
            .await;

        Ok(items)
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Submit an order. The backend prices it authoritatively.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or is unreachable.
    #[instrument(
        skip(self, token, draft),
        fields(restaurant_id = %draft.restaurant_id, lines = draft.items.len())
    )]
    pub async fn create_order(
        &self,
        token: &SecretString,
        draft: &OrderDraft,
    ) -> Result<Order, BackendError> {
        let body = CreateOrderRequest::from(draft);
        let row: OrderRow = self.post("/api/orders/", Some(token), &body).await?;
        convert_order(row)
    }

    /// Get one order with its items and delivery.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for an unknown order id.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn get_order(&self, token: &SecretString, id: OrderId) -> Result<Order, BackendError> {
        let row: OrderRow = self
            .get(&format!("/api/orders/{id}"), Some(token))
            .await
            .map_err(|e| not_found(e, || format!("Order not found: {id}")))?;
        convert_order(row)
    }

    /// A user's order history, newest first.
    ///
    /// Degrades to an empty list when the backend cannot answer.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn user_orders(&self, token: &SecretString, user_id: UserId) -> Vec<Order> {
        let rows: Vec<OrderRow> = match self
            .get(&format!("/api/users/{user_id}/orders"), Some(token))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "User orders unavailable");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| {
                convert_order(row)
                    .inspect_err(|e| warn!(error = %e, "Skipping invalid order row"))
                    .ok()
            })
            .collect()
    }

    // =========================================================================
    // Report Methods
    // =========================================================================

    /// Per-restaurant revenue rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or a row has no name.
    #[instrument(skip(self, token))]
    pub async fn revenue_report(
        &self,
        token: &SecretString,
    ) -> Result<Vec<RestaurantRevenue>, BackendError> {
        let rows: Vec<RevenueRow> = self.get("/api/reports/revenue", Some(token)).await?;
        rows.into_iter().map(convert_revenue_row).collect()
    }

    /// Platform-wide metrics for an optional date range.
    ///
    /// The payload is passed through untouched; `None` when unavailable.
    #[instrument(skip(self, token))]
    pub async fn platform_metrics(
        &self,
        token: &SecretString,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<serde_json::Value> {
        let mut url = self.url("/api/reports/platform-metrics").ok()?;
        if start.is_some() || end.is_some() {
            let mut pairs = url.query_pairs_mut();
            if let Some(start) = start {
                pairs.append_pair("startDate", &start.to_string());
            }
            if let Some(end) = end {
                pairs.append_pair("endDate", &end.to_string());
            }
        }

        self.execute::<serde_json::Value, ()>(Method::GET, url, Some(token), None)
            .await
            .inspect_err(|e| warn!(error = %e, "Platform metrics unavailable"))
            .ok()
    }

    /// Backend-computed dashboard for one restaurant; `None` when unavailable.
    #[instrument(skip(self, token), fields(restaurant_id = %id))]
    pub async fn restaurant_dashboard(
        &self,
        token: &SecretString,
        id: RestaurantId,
    ) -> Option<serde_json::Value> {
        self.get(&format!("/api/dashboard/restaurant/{id}"), Some(token))
            .await
            .inspect_err(|e| warn!(error = %e, "Restaurant dashboard unavailable"))
            .ok()
    }
}

/// Map a backend 404 onto `BackendError::NotFound`.
fn not_found(err: BackendError, what: impl FnOnce() -> String) -> BackendError {
    match err {
        BackendError::Api { status, .. } if status == StatusCode::NOT_FOUND => {
            BackendError::NotFound(what())
        }
        other => other,
    }
}
