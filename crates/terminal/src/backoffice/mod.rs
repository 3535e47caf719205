//! Back-office API client.
//!
//! The hosting back-office owns the catalog, the customer list, and order
//! intake; the terminal only calls it. Plain JSON over REST with a bearer
//! token. Catalog reads by id are cached via `moka` (60-second TTL); search
//! queries are never cached.
//!
//! # Endpoints consumed
//!
//! ```text
//! GET  /api/pos/products/{id}
//! GET  /api/pos/products?q=...&limit=...
//! GET  /api/pos/customers/{id}
//! GET  /api/pos/customers?q=...
//! POST /api/pos/orders
//! ```

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use countertop_core::{Customer, CustomerId, OrderDraft, Product, ProductId};

use crate::config::BackofficeConfig;
use cache::{CacheKey, CacheValue};

/// Errors that can occur when calling the back-office API.
#[derive(Debug, Error)]
pub enum BackofficeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The back-office returned a non-success status.
    #[error("back-office returned {status}")]
    Status { status: reqwest::StatusCode },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the back-office.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl BackofficeError {
    /// Stable machine-readable code for API payloads.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Status { .. } => "backoffice_unavailable",
            Self::NotFound(_) => "not_found",
            Self::RateLimited(_) => "rate_limited",
        }
    }
}

/// The back-office's acknowledgement of a submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Back-office order reference (e.g., "POS-20260806-0042").
    pub reference: String,
}

// =============================================================================
// BackofficeClient
// =============================================================================

/// Client for the back-office POS API.
///
/// Cheaply cloneable; product and customer reads are cached for 60 seconds.
#[derive(Clone)]
pub struct BackofficeClient {
    inner: Arc<BackofficeClientInner>,
}

struct BackofficeClientInner {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl BackofficeClient {
    /// Create a new back-office client.
    #[must_use]
    pub fn new(config: &BackofficeConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(60))
            .build();

        Self {
            inner: Arc::new(BackofficeClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Fetch a product by id, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::NotFound`] for an unknown id, or a
    /// transport/status error.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, BackofficeError> {
        let cache_key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!(%id, "Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .get_json(&format!("/api/pos/products/{id}"), &[])
            .await
            .map_err(|error| match error {
                BackofficeError::Status { status } if status == reqwest::StatusCode::NOT_FOUND => {
                    BackofficeError::NotFound(format!("product {id}"))
                }
                other => other,
            })?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Fetch a customer by id, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::NotFound`] for an unknown id, or a
    /// transport/status error.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, BackofficeError> {
        let cache_key = CacheKey::Customer(id);
        if let Some(CacheValue::Customer(customer)) = self.inner.cache.get(&cache_key).await {
            debug!(%id, "Cache hit for customer");
            return Ok(*customer);
        }

        let customer: Customer = self
            .get_json(&format!("/api/pos/customers/{id}"), &[])
            .await
            .map_err(|error| match error {
                BackofficeError::Status { status } if status == reqwest::StatusCode::NOT_FOUND => {
                    BackofficeError::NotFound(format!("customer {id}"))
                }
                other => other,
            })?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Customer(Box::new(customer.clone())))
            .await;
        Ok(customer)
    }

    /// Search the catalog. Search results are not cached.
    ///
    /// # Errors
    ///
    /// Returns a transport/status error if the back-office call fails.
    pub async fn search_products(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Product>, BackofficeError> {
        self.get_json("/api/pos/products", &[("q", query), ("limit", &limit.to_string())])
            .await
    }

    /// Search the customer list. Results are not cached.
    ///
    /// # Errors
    ///
    /// Returns a transport/status error if the back-office call fails.
    pub async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, BackofficeError> {
        self.get_json("/api/pos/customers", &[("q", query)]).await
    }

    /// Submit an order draft for intake.
    ///
    /// # Errors
    ///
    /// Returns a transport/status error if the back-office rejects the
    /// submission; the caller must leave the cart intact in that case.
    pub async fn submit_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, BackofficeError> {
        let url = format!("{}/api/pos/orders", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(&self.inner.api_token)
            .json(draft)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Execute a GET request against the back-office API.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BackofficeError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(&self.inner.api_token)
            .query(query)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackofficeError> {
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackofficeError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Back-office returned non-success status"
            );
            return Err(BackofficeError::Status { status });
        }

        Ok(response.json().await?)
    }
}
