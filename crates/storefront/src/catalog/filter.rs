//! Read-only menu projection by category tab and search text.

use serde::Deserialize;

use super::CatalogItem;

/// Category tab that shows every category.
pub const ALL_CATEGORIES: &str = "Semua";

/// Category and search filter for the menu listing.
///
/// Only active items are ever listed. The filter never affects cart or stock
/// rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    /// Raw category label, or `Semua` / absent for all categories.
    pub category: Option<String>,
    /// Case-insensitive substring of the item name.
    #[serde(default, rename = "q")]
    pub query: String,
}

impl CatalogFilter {
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let category_matches = match self.category.as_deref() {
            None | Some(ALL_CATEGORIES) => true,
            Some(label) => item.category_label == label,
        };

        category_matches
            && item.is_active()
            && item
                .name
                .to_lowercase()
                .contains(&self.query.to_lowercase())
    }
}
