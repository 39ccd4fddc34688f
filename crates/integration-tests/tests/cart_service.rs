//! End-to-end reconciliation scenarios over in-memory doubles.
//!
//! These exercise the whole service surface: load, seed, mutate, price
//! refresh, broadcast - without touching the network or the filesystem.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use bazari_core::{CartId, ProductId};
use bazari_integration_tests::{MockCatalog, line, service};
use bazari_storefront::cart::{
    Cart, CartCountSignal, CartService, CartStore, MemoryCartStore, MutationOutcome, Persistence,
    VisitToken,
};

const STORED_CART: &str = r#"{
    "id": 1,
    "userId": 1,
    "date": "2020-03-02T00:00:00.000Z",
    "products": [{ "productId": 1, "quantity": 2 }]
}"#;

#[tokio::test]
async fn empty_store_initializes_to_empty_cart_and_zero_count() {
    let signal = CartCountSignal::new();
    let mut svc = CartService::new(MemoryCartStore::new(), MockCatalog::new(), signal.clone());

    svc.initialize().await;

    assert!(svc.cart().is_empty());
    assert_eq!(signal.read(), 0);
}

#[tokio::test]
async fn persisted_cart_with_known_price_totals_correctly() {
    // Persisted {productId: 1, quantity: 2}, catalog price 9.99 -> 19.98
    let catalog = MockCatalog::new().with_product(1, "9.99");
    let mut svc = service(MemoryCartStore::with_blob(STORED_CART), catalog);

    svc.initialize().await;
    let merged = svc.refresh_prices(&VisitToken::new()).await;

    assert_eq!(merged, 1);
    assert_eq!(svc.total(), "19.98".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn partial_price_failure_keeps_other_prices() {
    let blob = r#"{
        "id": 1, "userId": 1, "date": "2020-03-02T00:00:00.000Z",
        "products": [
            { "productId": 1, "quantity": 1 },
            { "productId": 2, "quantity": 1 },
            { "productId": 3, "quantity": 1 }
        ]
    }"#;
    let catalog = MockCatalog::new()
        .with_product(1, "2.50")
        .with_product(3, "5.00")
        .failing(2);
    let mut svc = service(MemoryCartStore::with_blob(blob), catalog);

    svc.initialize().await;
    let merged = svc.refresh_prices(&VisitToken::new()).await;

    assert_eq!(merged, 2);
    assert_eq!(svc.prices().len(), 2);
    // Product 2 falls back to zero in the total
    assert_eq!(svc.total(), "7.50".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn set_quantity_clamps_and_broadcasts_fresh_total() {
    let signal = CartCountSignal::new();
    let mut svc = CartService::new(
        MemoryCartStore::with_blob(STORED_CART),
        MockCatalog::new(),
        signal.clone(),
    );
    svc.initialize().await;
    assert_eq!(signal.read(), 2);

    let outcome = svc.set_quantity(ProductId::new(1), 11).await;

    assert!(outcome.is_durable());
    assert_eq!(svc.cart().line(ProductId::new(1)).unwrap().quantity.get(), 10);
    assert_eq!(signal.read(), 10);
}

#[tokio::test]
async fn remove_item_updates_store_and_count() {
    let store = MemoryCartStore::with_blob(STORED_CART);
    let signal = CartCountSignal::new();
    let mut svc = CartService::new(store.clone(), MockCatalog::new(), signal.clone());
    svc.initialize().await;

    let outcome = svc.remove_item(ProductId::new(1)).await;

    assert!(outcome.is_durable());
    assert!(svc.cart().is_empty());
    assert_eq!(signal.read(), 0);
    assert!(store.raw().unwrap().contains("\"products\":[]"));
}

#[tokio::test]
async fn malformed_blob_is_treated_as_absent() {
    let store = MemoryCartStore::with_blob("{definitely not json");
    let mut svc = service(store, MockCatalog::new());

    svc.initialize().await;

    assert!(svc.cart().is_empty());
}

#[tokio::test]
async fn unknown_persisted_fields_are_ignored() {
    let blob = r#"{
        "id": 1, "userId": 1, "date": "2020-03-02T00:00:00.000Z",
        "products": [{ "productId": 4, "quantity": 3, "addedFrom": "search" }],
        "syncedAt": "2024-06-01T00:00:00Z"
    }"#;
    let mut svc = service(MemoryCartStore::with_blob(blob), MockCatalog::new());

    svc.initialize().await;

    assert_eq!(svc.cart().items, vec![line(4, 3)]);
}

#[tokio::test]
async fn seed_from_catalog_persists_and_broadcasts() {
    let mut remote = Cart::empty();
    remote.items = vec![line(1, 4), line(2, 1)];

    let store = MemoryCartStore::new();
    let signal = CartCountSignal::new();
    let mut svc = CartService::new(
        store.clone(),
        MockCatalog::new().with_remote_cart(remote),
        signal.clone(),
    );
    svc.initialize().await;
    assert!(svc.cart().is_empty());

    svc.seed_from_catalog(CartId::new(1)).await.unwrap();

    assert_eq!(svc.cart().items.len(), 2);
    assert_eq!(signal.read(), 5);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn seed_failure_leaves_local_state_untouched() {
    let mut svc = service(MemoryCartStore::with_blob(STORED_CART), MockCatalog::new());
    svc.initialize().await;

    let err = svc.seed_from_catalog(CartId::new(9)).await.unwrap_err();

    assert!(err.to_string().contains("404"));
    assert_eq!(svc.cart().items, vec![line(1, 2)]);
}

#[tokio::test]
async fn dismissed_visit_discards_late_price_batch() {
    let token = VisitToken::new();
    let catalog = MockCatalog::new()
        .with_product(1, "9.99")
        .cancelling(token.clone());
    let mut svc = service(MemoryCartStore::with_blob(STORED_CART), catalog);
    svc.initialize().await;

    let merged = svc.refresh_prices(&token).await;

    assert_eq!(merged, 0);
    assert!(svc.prices().is_empty());
    assert_eq!(svc.total(), Decimal::ZERO);
}

#[tokio::test]
async fn save_failure_is_reported_but_not_rolled_back() {
    let store = MemoryCartStore::with_blob(STORED_CART);
    let signal = CartCountSignal::new();
    let mut svc = CartService::new(store.clone(), MockCatalog::new(), signal.clone());
    svc.initialize().await;

    store.fail_saves(true);
    let outcome = svc.set_quantity(ProductId::new(1), 7).await;

    assert!(matches!(
        outcome,
        MutationOutcome::Applied(Persistence::MemoryOnly(_))
    ));
    assert_eq!(svc.cart().line(ProductId::new(1)).unwrap().quantity.get(), 7);
    // The badge follows the in-memory cart, which stays authoritative
    assert_eq!(signal.read(), 7);
}

#[tokio::test]
async fn refresh_reloads_persisted_state() {
    let store = MemoryCartStore::with_blob(STORED_CART);
    let mut svc = service(store.clone(), MockCatalog::new());
    svc.initialize().await;

    // Another writer replaced the blob (e.g., an add-to-cart on a different
    // screen); a pull-to-refresh picks it up
    let mut replacement = Cart::empty();
    replacement.items = vec![line(8, 1)];
    store
        .save(&replacement)
        .await
        .unwrap();

    svc.refresh().await;

    assert_eq!(svc.cart().items, vec![line(8, 1)]);
}

#[tokio::test]
async fn subscriber_observes_mutation_counts_in_order() {
    let signal = CartCountSignal::new();
    let mut rx = signal.subscribe();
    let mut svc = CartService::new(
        MemoryCartStore::with_blob(STORED_CART),
        MockCatalog::new(),
        signal,
    );

    svc.initialize().await;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 2);

    let _ = svc.set_quantity(ProductId::new(1), 5).await;
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 5);
}
