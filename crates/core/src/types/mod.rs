//! Core types for the Dapur storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod delivery;
pub mod id;
pub mod price;
pub mod status;

pub use delivery::{DeliveryZone, PaymentMethod, SELF_PICKUP_ADDRESS, UnknownVariant};
pub use id::ItemId;
pub use price::{CurrencyCode, Price};
pub use status::ItemStatus;
