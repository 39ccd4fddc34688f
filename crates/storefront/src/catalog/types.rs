//! Domain types for the catalog API.
//!
//! These mirror the JSON records the public API serves. Unknown fields are
//! ignored on deserialization so newer API revisions do not break the client.

use serde::{Deserialize, Serialize};

use bazari_core::{Price, ProductId};

/// A catalog product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Long-form description.
    pub description: String,
    /// Category slug (e.g., "electronics").
    pub category: String,
    /// Product image URL.
    pub image: String,
    /// Aggregate review rating.
    #[serde(default)]
    pub rating: Rating,
}

/// Aggregate review rating for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Rating {
    /// Average rating value (e.g., 4.5).
    pub rate: f64,
    /// Total number of reviews.
    pub count: i64,
}

/// Credentials sent to the auth endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token returned by the auth endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}
