//! Live tests against the public catalog API.
//!
//! These require network access and depend on data the public API happens to
//! serve, so they are `#[ignore]`d by default.
//!
//! Run with: `cargo test -p bazari-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use bazari_core::{CartId, ProductId};
use bazari_storefront::catalog::{Catalog, CatalogClient};
use bazari_storefront::config::{AppConfig, DEFAULT_API_BASE_URL};

fn live_client() -> CatalogClient {
    let config = AppConfig {
        api_base_url: DEFAULT_API_BASE_URL.parse().unwrap(),
        data_dir: std::env::temp_dir().join("bazari-live-tests"),
        http_timeout: Duration::from_secs(15),
        default_cart_id: CartId::new(1),
    };
    CatalogClient::new(&config).unwrap()
}

#[tokio::test]
#[ignore = "hits the public catalog API"]
async fn live_product_list_is_non_empty() {
    let products = live_client().products().await.unwrap();
    assert!(!products.is_empty());
}

#[tokio::test]
#[ignore = "hits the public catalog API"]
async fn live_single_product_matches_requested_id() {
    let product = live_client().product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.id, ProductId::new(1));
    assert!(!product.title.is_empty());
}

#[tokio::test]
#[ignore = "hits the public catalog API"]
async fn live_remote_cart_has_line_items() {
    let cart = live_client().remote_cart(CartId::new(1)).await.unwrap();
    assert!(!cart.items.is_empty());
}
