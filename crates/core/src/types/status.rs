//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Catalog item activation status.
///
/// The catalog sheet marks sellable items with the literal `AKTIF`; any other
/// value (blank, `TIDAK AKTIF`, `HABIS`...) hides the item from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "AKTIF")]
    Active,
    #[serde(rename = "TIDAK AKTIF")]
    Inactive,
}

impl ItemStatus {
    /// Interpret a raw status cell from the catalog.
    ///
    /// Matching is exact: only `AKTIF` is active.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw == "AKTIF" {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Whether the item may be listed and added.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "AKTIF"),
            Self::Inactive => write!(f, "TIDAK AKTIF"),
        }
    }
}
