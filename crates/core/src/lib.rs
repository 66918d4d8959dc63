//! Dapur Core - Shared types library.
//!
//! This crate provides common types used across the Dapur storefront:
//! - `storefront` - Catalog loading, cart/ledger reconciliation and checkout
//! - `integration-tests` - End-to-end tests over the HTTP surface
//!
//! # Architecture
//!
//! The core crate contains only types and their pure rules - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Item identity, ringgit prices, item status, delivery zones
//!   and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
