//! Unified error handling.
//!
//! Provides a unified `AppError` type over the per-module errors. Library
//! consumers (the CLI, tests) work with `Result<T, AppError>`; inside the
//! reconciliation core most failures degrade rather than propagate, per the
//! availability-over-completeness design.

use thiserror::Error;

use crate::cart::StoreError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An operation required a session and none is stored.
    #[error("Not logged in")]
    NotLoggedIn,
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
