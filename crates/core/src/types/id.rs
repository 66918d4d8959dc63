//! Newtype ID for catalog item references.
//!
//! The catalog endpoint hands out item identities as opaque strings (some
//! sheets emit them as numbers, which the loader stringifies). Wrapping them
//! keeps item identities from being mixed up with names or categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a catalog item.
///
/// Unique within one catalog load, and the key for both the inventory ledger
/// and the cart.
///
/// # Example
///
/// ```rust
/// use dapur_core::ItemId;
///
/// let id = ItemId::new("m1");
/// assert_eq!(id.as_str(), "m1");
/// assert_eq!(id.to_string(), "m1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new ID from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_transparently() {
        let id = ItemId::new("m3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"m3\"");

        let parsed: ItemId = serde_json::from_str("\"m3\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_conversions_agree() {
        assert_eq!(ItemId::from("m1"), ItemId::from("m1".to_string()));
        assert_eq!(ItemId::new("m1").into_inner(), "m1");
    }
}
