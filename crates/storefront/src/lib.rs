//! Bazari Storefront - cart reconciliation core.
//!
//! This crate is the non-visual heart of the Bazari storefront: it loads the
//! locally persisted cart, enriches its line items with live prices from the
//! remote catalog, applies quantity and removal mutations, and keeps a
//! process-wide item count observable by any screen.
//!
//! # Architecture
//!
//! - [`catalog`] - Read-only HTTP client for the public catalog API
//! - [`cart`] - Local cart store, reconciliation service, and count broadcast
//! - [`session`] - Persisted session marker read by the presentation layer
//! - [`config`] - Environment-driven configuration
//! - [`state`] - Shared application state wiring the pieces together
//!
//! The catalog is the source of truth for prices; the local store is the
//! source of truth for the cart's contents. Reconciliation merges the two and
//! degrades gracefully: a missing price falls back to zero, a failed save
//! leaves the in-memory cart authoritative.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
