//! Line item quantity, clamped to the storefront's per-line limit.

use serde::{Deserialize, Deserializer, Serialize};

/// Smallest quantity a line item may hold.
pub const MIN_QUANTITY: u8 = 1;
/// Largest quantity a line item may hold.
pub const MAX_QUANTITY: u8 = 10;

/// A cart line quantity, guaranteed to be within `[1, 10]`.
///
/// Every constructor clamps into range, so a `Quantity` held anywhere in the
/// program is always valid. Out-of-range values in persisted data are clamped
/// on load rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(u8);

impl Quantity {
    /// Quantity of a freshly added line item.
    pub const ONE: Self = Self(MIN_QUANTITY);

    /// Clamp an arbitrary requested amount into the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn clamped(requested: i64) -> Self {
        if requested < MIN_QUANTITY as i64 {
            Self(MIN_QUANTITY)
        } else if requested > MAX_QUANTITY as i64 {
            Self(MAX_QUANTITY)
        } else {
            Self(requested as u8)
        }
    }

    /// Get the quantity value.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// One more unit, saturating at the per-line limit.
    #[must_use]
    pub const fn incremented(&self) -> Self {
        Self::clamped(self.0 as i64 + 1)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(Self::clamped(raw))
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        Self::from(quantity.0)
    }
}
