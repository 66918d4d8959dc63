//! Dapur Mommy storefront library.
//!
//! Menu loading with an offline fallback, a session cart reconciled against a
//! stock ledger, and a checkout that records orders remotely when it can and
//! always hands them off to WhatsApp.
//!
//! The binary in `main.rs` only wires configuration, telemetry and the
//! server; everything else lives here so it can be tested directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shop;
pub mod state;
