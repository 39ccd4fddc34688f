//! Integration tests for Bazari.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline scenario tests (no network needed)
//! cargo test -p bazari-integration-tests
//!
//! # Live tests against the public catalog API
//! cargo test -p bazari-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_service` - End-to-end reconciliation scenarios over in-memory
//!   doubles
//! - `cart_store` - Persistence round-trips and the overlapping-save weakness
//! - `live_catalog` - `#[ignore]`d tests that hit the real catalog API
//!
//! This crate's library provides the shared test doubles: [`MockCatalog`] and
//! small builders for products and carts.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use bazari_core::{CartId, Price, ProductId, Quantity};
use bazari_storefront::cart::{Cart, CartCountSignal, CartService, LineItem, MemoryCartStore, VisitToken};
use bazari_storefront::catalog::types::Rating;
use bazari_storefront::catalog::{Catalog, CatalogError, Product};

/// Build a catalog product with the given id and price.
///
/// # Panics
///
/// Panics if `price` is not a valid decimal literal.
#[must_use]
pub fn product(id: i64, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Price::new(price.parse().expect("valid decimal literal")),
        description: "A test product".to_string(),
        category: "test".to_string(),
        image: format!("https://example.test/{id}.jpg"),
        rating: Rating::default(),
    }
}

/// Build a cart line item.
#[must_use]
pub fn line(product_id: i64, quantity: i64) -> LineItem {
    LineItem {
        product_id: ProductId::new(product_id),
        quantity: Quantity::clamped(quantity),
    }
}

/// In-memory catalog double.
///
/// Serves products from a fixed map, fails the configured ids, optionally
/// serves a remote cart record, and can cancel a [`VisitToken`] from inside a
/// fetch to simulate a screen dismissed mid-flight.
#[derive(Default)]
pub struct MockCatalog {
    products: HashMap<ProductId, Product>,
    fail: HashSet<ProductId>,
    remote: Option<Cart>,
    cancel_during_fetch: Option<VisitToken>,
}

impl MockCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product priced at `price`.
    #[must_use]
    pub fn with_product(mut self, id: i64, price: &str) -> Self {
        let product = product(id, price);
        self.products.insert(product.id, product);
        self
    }

    /// Make fetches for `id` fail with a server error.
    #[must_use]
    pub fn failing(mut self, id: i64) -> Self {
        self.fail.insert(ProductId::new(id));
        self
    }

    /// Serve `cart` as the remote cart record.
    #[must_use]
    pub fn with_remote_cart(mut self, cart: Cart) -> Self {
        self.remote = Some(cart);
        self
    }

    /// Cancel `token` the moment any fetch starts, simulating a screen
    /// dismissed while the batch is in flight.
    #[must_use]
    pub fn cancelling(mut self, token: VisitToken) -> Self {
        self.cancel_during_fetch = Some(token);
        self
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(token) = &self.cancel_during_fetch {
            token.cancel();
        }
        if self.fail.contains(&id) {
            return Err(CatalogError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        self.products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn remote_cart(&self, id: CartId) -> Result<Cart, CatalogError> {
        self.remote.clone().ok_or(CatalogError::Api {
            status: 404,
            message: format!("no remote cart {id}"),
        })
    }
}

/// A service over an in-memory store and the given catalog double, with a
/// fresh count signal.
#[must_use]
pub fn service(
    store: MemoryCartStore,
    catalog: MockCatalog,
) -> CartService<MemoryCartStore, MockCatalog> {
    CartService::new(store, catalog, CartCountSignal::new())
}
