//! Remote catalog API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`, JSON bodies via `serde`
//! - The catalog is the source of truth for prices - NO local sync, direct
//!   API calls
//! - In-memory caching via `moka` for product responses (5 minute TTL)
//!
//! # Endpoints
//!
//! - `GET /products` - full product list
//! - `GET /products/{id}` - single product
//! - `GET /carts/{id}` - remote cart record, used to seed an empty local cart
//! - `POST /auth/login` - session token for the presentation layer
//!
//! # Example
//!
//! ```rust,ignore
//! use bazari_storefront::catalog::{Catalog, CatalogClient};
//!
//! let client = CatalogClient::new(&config)?;
//! let product = client.product(ProductId::new(1)).await?;
//! println!("{}: {}", product.title, product.price);
//! ```

mod cache;
mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::{Product, Rating};

use async_trait::async_trait;
use thiserror::Error;

use bazari_core::{CartId, ProductId};

use crate::cart::Cart;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Product id with no catalog match.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only view of the remote catalog, as needed by cart reconciliation.
///
/// The concrete implementation is [`CatalogClient`]; tests substitute an
/// in-memory double.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a single product by id.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Fetch a remote cart record by id.
    async fn remote_cart(&self, id: CartId) -> Result<Cart, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound(ProductId::new(123));
        assert_eq!(err.to_string(), "Product not found: 123");

        let err = CatalogError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - unavailable");
    }
}
