//! Catalog API client implementation.
//!
//! Uses `reqwest` for HTTP with `serde` JSON decoding. Product responses are
//! cached using `moka` (5-minute TTL); cart and auth calls always go to the
//! network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use bazari_core::{CartId, ProductId};

use crate::cart::Cart;
use crate::config::AppConfig;

use super::cache::CacheValue;
use super::types::{LoginRequest, LoginResponse, Product};
use super::{Catalog, CatalogError};

/// Client for the remote catalog API.
///
/// Provides read-only access to products and carts plus the auth endpoint.
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AppConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let text = self.get_text(url).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Execute a GET request and return the raw body, surfacing non-success
    /// statuses as typed failures.
    async fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }

    /// Get the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body cannot be parsed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let url = format!("{}/products", self.inner.base_url);
        let products: Vec<Product> = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Log in with catalog credentials and obtain a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SecretString, CatalogError> {
        let url = format!("{}/auth/login", self.inner.base_url);

        let response = self
            .inner
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: LoginResponse = response.json().await?;
        Ok(SecretString::from(body.token))
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    #[instrument(skip(self), fields(id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = format!("{}/products/{id}", self.inner.base_url);
        let text = self.get_text(&url).await?;

        // The API answers unknown product ids with 200 and an empty body
        if text.trim().is_empty() || text.trim() == "null" {
            return Err(CatalogError::NotFound(id));
        }

        let product: Product = serde_json::from_str(&text)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn remote_cart(&self, id: CartId) -> Result<Cart, CatalogError> {
        let url = format!("{}/carts/{id}", self.inner.base_url);
        self.get_json(&url).await
    }
}
