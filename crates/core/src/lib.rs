//! Bazari Core - Shared types library.
//!
//! This crate provides common types used across all Bazari components:
//! - `storefront` - Cart reconciliation core (catalog client, cart store, service)
//! - `cli` - Command-line front-end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
