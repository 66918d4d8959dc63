//! External services used by the storefront.
//!
//! # Services
//!
//! - `recommendation` - Gemini menu suggestions

pub mod recommendation;

pub use recommendation::{RecommendationError, Recommender};
