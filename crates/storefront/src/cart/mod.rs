//! Cart domain types, local persistence, and the reconciliation service.
//!
//! The cart lives in two places: a durable JSON blob in the local store and an
//! in-memory copy held by [`CartService`]. Every mutation updates the
//! in-memory copy first, then persists best-effort; the in-memory copy stays
//! authoritative when a save fails. Prices are never persisted - they are
//! fetched from the catalog on demand and merged into an ephemeral
//! [`PriceIndex`].

mod service;
mod signal;
mod store;

pub use service::{
    CartService, MutationOutcome, Persistence, PriceIndex, ServiceState, VisitToken, compute_total,
};
pub use signal::CartCountSignal;
pub use store::{CartStore, FileCartStore, MemoryCartStore, StoreError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazari_core::{CartId, ProductId, Quantity, UserId};

/// One product-id/quantity pair within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog product this line refers to.
    pub product_id: ProductId,
    /// Units of the product, clamped to the per-line limit.
    pub quantity: Quantity,
}

/// The per-device record of selected products and quantities.
///
/// Serialized layout matches the catalog API's cart records:
/// `{"id":1,"userId":1,"date":"...","products":[{"productId":1,"quantity":2}]}`.
/// Extra fields in persisted or remote data are ignored.
///
/// Invariant: `product_id` values across `items` are unique. Insertion order
/// is preserved but carries no meaning. Data from outside the process goes
/// through [`Cart::normalized`] to restore the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart record id.
    pub id: CartId,
    /// Owning user id.
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Creation timestamp.
    #[serde(rename = "date")]
    pub created: DateTime<Utc>,
    /// Line items, keyed by product id.
    #[serde(rename = "products")]
    pub items: Vec<LineItem>,
}

impl Cart {
    /// A fresh empty cart, substituted when nothing is persisted yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: CartId::new(1),
            user_id: UserId::new(1),
            created: Utc::now(),
            items: Vec::new(),
        }
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| u32::from(item.quantity)).sum()
    }

    /// The line item for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Restore the unique-product-id invariant on data from outside the
    /// process: duplicate lines are merged by summing quantities (clamped),
    /// keeping first-occurrence order.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let mut merged: Vec<LineItem> = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            match merged.iter_mut().find(|m| m.product_id == item.product_id) {
                Some(existing) => {
                    let total =
                        i64::from(existing.quantity.get()) + i64::from(item.quantity.get());
                    existing.quantity = Quantity::clamped(total);
                }
                None => merged.push(item),
            }
        }
        self.items = merged;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64) -> LineItem {
        LineItem {
            product_id: ProductId::new(product_id),
            quantity: Quantity::clamped(quantity),
        }
    }

    #[test]
    fn test_persisted_layout_uses_api_field_names() {
        let cart = Cart {
            id: CartId::new(1),
            user_id: UserId::new(2),
            created: "2020-03-02T00:00:00Z".parse().unwrap(),
            items: vec![line(3, 4)],
        };

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value["userId"], 2);
        assert_eq!(value["products"][0]["productId"], 3);
        assert_eq!(value["products"][0]["quantity"], 4);
        assert!(value.get("date").is_some());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "id": 1,
            "userId": 1,
            "date": "2020-03-02T00:00:00.000Z",
            "products": [{ "productId": 1, "quantity": 2, "note": "gift" }],
            "__v": 0
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.items, vec![line(1, 2)]);
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::empty();
        cart.items = vec![line(1, 2), line(2, 5)];
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_normalized_merges_duplicates() {
        let mut cart = Cart::empty();
        cart.items = vec![line(1, 2), line(2, 1), line(1, 3)];
        let cart = cart.normalized();
        assert_eq!(cart.items, vec![line(1, 5), line(2, 1)]);
    }

    #[test]
    fn test_normalized_clamps_merged_quantity() {
        let mut cart = Cart::empty();
        cart.items = vec![line(1, 8), line(1, 8)];
        let cart = cart.normalized();
        assert_eq!(cart.items, vec![line(1, 10)]);
    }
}
