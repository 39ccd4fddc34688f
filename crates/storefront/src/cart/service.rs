//! Cart reconciliation service.
//!
//! Merges persisted cart state with live catalog prices and funnels every
//! mutation through a single in-memory [`Cart`]. Execution is single-threaded
//! cooperative: service methods take `&mut self`, so mutations are serialized;
//! only the individual price fetches inside [`CartService::refresh_prices`]
//! run concurrently.
//!
//! Persistence is optimistic. A mutation is applied in memory first, then
//! saved best-effort; the caller sees whether the save stuck through
//! [`MutationOutcome`]. Overlapping saves at the storage layer are
//! last-write-wins and may complete out of order - an accepted weakness of
//! this design, covered by a test rather than a locking scheme.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use bazari_core::{CartId, Price, ProductId, Quantity};

use crate::catalog::{Catalog, CatalogError};

use super::signal::CartCountSignal;
use super::store::{CartStore, StoreError};
use super::{Cart, LineItem};

/// Ephemeral mapping from product id to its last known catalog price.
///
/// Owned exclusively by the service; never persisted. Rebuilt by merging in
/// whatever a price refresh manages to fetch - keys that fail to fetch keep
/// their previous value.
#[derive(Debug, Clone, Default)]
pub struct PriceIndex {
    prices: HashMap<ProductId, Price>,
}

impl PriceIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The known price for `product_id`, if any.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<Price> {
        self.prices.get(&product_id).copied()
    }

    /// The known price for `product_id`, or zero when none is known.
    #[must_use]
    pub fn price_or_zero(&self, product_id: ProductId) -> Price {
        self.get(product_id).unwrap_or(Price::ZERO)
    }

    /// Record a fetched price.
    pub fn insert(&mut self, product_id: ProductId, price: Price) {
        self.prices.insert(product_id, price);
    }

    /// Number of known prices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no prices are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Drop prices for products no longer in the cart.
    fn retain_cart(&mut self, cart: &Cart) {
        self.prices
            .retain(|id, _| cart.items.iter().any(|item| item.product_id == *id));
    }
}

/// Aggregate cart total: `sum(quantity x price)` with a zero fallback for
/// unknown prices, rounded to two decimal places for display.
///
/// Pure - does not touch the service's state, and invariant under reordering
/// of the cart's items.
#[must_use]
pub fn compute_total(cart: &Cart, prices: &PriceIndex) -> Decimal {
    cart.items
        .iter()
        .map(|item| prices.price_or_zero(item.product_id).extend(item.quantity))
        .sum::<Decimal>()
        .round_dp(2)
}

/// Where the service is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Nothing loaded yet; the cart is a placeholder.
    Loading,
    /// The cart has been loaded (or substituted) and is serving operations.
    Ready,
}

/// Result of a cart mutation.
///
/// Distinguishes "nothing changed" from "changed in memory", and for changes,
/// whether the new state is durably persisted. Callers decide whether a
/// memory-only outcome warrants a retry.
#[derive(Debug)]
#[must_use]
pub enum MutationOutcome {
    /// The operation was a no-op; no write was issued.
    Unchanged,
    /// The in-memory cart changed.
    Applied(Persistence),
}

/// Persistence status of an applied mutation.
#[derive(Debug)]
pub enum Persistence {
    /// The mutation reached the local store.
    Durable,
    /// The save failed; the in-memory cart is authoritative until the next
    /// successful save. This is deliberate - the mutation is not rolled back.
    MemoryOnly(StoreError),
}

impl MutationOutcome {
    /// Whether the mutation changed the in-memory cart.
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Whether the mutation both changed the cart and reached the store.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        matches!(self, Self::Applied(Persistence::Durable))
    }
}

/// Liveness flag for one screen visit.
///
/// A price refresh started by a screen that is then dismissed must not update
/// state after dismissal. The screen holds a token per visit, cancels it on
/// dismissal, and the service discards any batch whose token was cancelled
/// while the fetches were in flight.
#[derive(Debug, Clone)]
pub struct VisitToken {
    live: Arc<AtomicBool>,
}

impl VisitToken {
    /// A live token for a new screen visit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the visit as dismissed.
    pub fn cancel(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Whether the visit has been dismissed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.live.load(Ordering::SeqCst)
    }
}

impl Default for VisitToken {
    fn default() -> Self {
        Self::new()
    }
}

/// The cart reconciliation service.
///
/// Holds the in-memory cart for the lifetime of the cart screen, loads and
/// persists it through a [`CartStore`], enriches it with prices from a
/// [`Catalog`], and publishes the item count through a [`CartCountSignal`].
pub struct CartService<S, C> {
    store: S,
    catalog: C,
    signal: CartCountSignal,
    state: ServiceState,
    cart: Cart,
    prices: PriceIndex,
}

impl<S: CartStore, C: Catalog> CartService<S, C> {
    /// Create a service in the `Loading` state with a placeholder empty cart.
    pub fn new(store: S, catalog: C, signal: CartCountSignal) -> Self {
        Self {
            store,
            catalog,
            signal,
            state: ServiceState::Loading,
            cart: Cart::empty(),
            prices: PriceIndex::new(),
        }
    }

    /// Load the persisted cart, substituting a fresh empty cart when nothing
    /// usable is stored. Never fails: malformed data and load faults both
    /// degrade to the empty cart.
    pub async fn initialize(&mut self) {
        let cart = match self.store.load().await {
            Ok(Some(cart)) => cart.normalized(),
            Ok(None) => Cart::empty(),
            Err(err) => {
                warn!(error = %err, "cart load failed; starting with an empty cart");
                Cart::empty()
            }
        };
        self.cart = cart;
        self.state = ServiceState::Ready;
        self.publish_count();
    }

    /// Re-run the load step (pull-to-refresh semantics).
    ///
    /// Mutations are serialized with the refresh by `&mut self`; the last
    /// completed operation wins.
    pub async fn refresh(&mut self) {
        self.initialize().await;
    }

    /// Replace the local cart with the remote cart record `id` and persist it.
    ///
    /// Used to hydrate a first-run installation whose local store is empty.
    /// A persistence failure is logged, not surfaced - the fetched cart is
    /// served from memory either way.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote cart cannot be fetched; the local
    /// state is left untouched in that case.
    pub async fn seed_from_catalog(&mut self, id: CartId) -> Result<(), CatalogError> {
        let cart = self.catalog.remote_cart(id).await?.normalized();
        self.cart = cart;
        self.state = ServiceState::Ready;
        if let Err(err) = self.store.save(&self.cart).await {
            warn!(error = %err, "seeded cart could not be persisted");
        }
        self.publish_count();
        Ok(())
    }

    /// Set the quantity of an existing line item, clamped into the valid
    /// range. A request that leaves the quantity unchanged, or that names a
    /// product not in the cart, is a no-op and issues no write.
    pub async fn set_quantity(&mut self, product_id: ProductId, requested: i64) -> MutationOutcome {
        let quantity = Quantity::clamped(requested);

        let Some(item) = self
            .cart
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        else {
            warn!(%product_id, "set_quantity for a product not in the cart");
            return MutationOutcome::Unchanged;
        };

        if item.quantity == quantity {
            return MutationOutcome::Unchanged;
        }

        item.quantity = quantity;
        self.commit().await
    }

    /// Add one unit of `product_id`: increments an existing line (saturating
    /// at the per-line limit) or appends a fresh line with quantity one.
    pub async fn add_item(&mut self, product_id: ProductId) -> MutationOutcome {
        match self
            .cart
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => {
                let next = item.quantity.incremented();
                if next == item.quantity {
                    return MutationOutcome::Unchanged;
                }
                item.quantity = next;
            }
            None => self.cart.items.push(LineItem {
                product_id,
                quantity: Quantity::ONE,
            }),
        }
        self.commit().await
    }

    /// Remove the line item for `product_id`. A no-op when the product is not
    /// in the cart; no write is issued.
    pub async fn remove_item(&mut self, product_id: ProductId) -> MutationOutcome {
        let before = self.cart.items.len();
        self.cart.items.retain(|item| item.product_id != product_id);
        if self.cart.items.len() == before {
            return MutationOutcome::Unchanged;
        }
        self.commit().await
    }

    /// Fetch prices for every product in the cart concurrently and merge the
    /// successes into the price index.
    ///
    /// A fetch failure for one product does not block the others; failures are
    /// logged and the affected keys keep their previous value (or fall back to
    /// zero in totals). If `visit` was cancelled while the batch was in
    /// flight, the whole batch is discarded. Returns the number of merged
    /// prices.
    pub async fn refresh_prices(&mut self, visit: &VisitToken) -> usize {
        let ids: Vec<ProductId> = self.cart.items.iter().map(|item| item.product_id).collect();
        if ids.is_empty() {
            return 0;
        }

        let fetches: Vec<_> = ids.iter().map(|&id| self.catalog.product(id)).collect();
        let results = futures::future::join_all(fetches).await;

        if visit.is_cancelled() {
            debug!("screen visit dismissed; discarding price batch");
            return 0;
        }

        self.prices.retain_cart(&self.cart);

        let mut merged = 0;
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(product) => {
                    self.prices.insert(id, product.price);
                    merged += 1;
                }
                Err(err) => {
                    warn!(%id, error = %err, "price fetch failed; keeping previous value");
                }
            }
        }
        merged
    }

    /// The in-memory cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current price index.
    #[must_use]
    pub fn prices(&self) -> &PriceIndex {
        &self.prices
    }

    /// The cart total under the current price index.
    #[must_use]
    pub fn total(&self) -> Decimal {
        compute_total(&self.cart, &self.prices)
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Persist the in-memory cart and publish the fresh count.
    ///
    /// The count is published even when the save fails: the in-memory cart is
    /// authoritative and the badge must reflect it.
    async fn commit(&mut self) -> MutationOutcome {
        let persistence = match self.store.save(&self.cart).await {
            Ok(()) => Persistence::Durable,
            Err(err) => {
                warn!(error = %err, "cart save failed; in-memory cart stays authoritative");
                Persistence::MemoryOnly(err)
            }
        };
        self.publish_count();
        MutationOutcome::Applied(persistence)
    }

    fn publish_count(&self) {
        self.signal.write(self.cart.item_count());
    }
}
