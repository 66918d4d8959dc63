//! Session-local inventory ledger.

use std::collections::HashMap;

use dapur_core::ItemId;

use crate::catalog::CatalogItem;

/// Remaining stock per item for the current session.
///
/// Seeded from the catalog at load time and moved by cart operations only.
/// Values are not clamped, so a ledger entry can go below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLedger {
    remaining: HashMap<ItemId, i64>,
}

impl InventoryLedger {
    /// Seed the ledger with each item's loaded stock.
    #[must_use]
    pub fn from_items(items: &[CatalogItem]) -> Self {
        Self {
            remaining: items
                .iter()
                .map(|item| (item.id.clone(), item.stock))
                .collect(),
        }
    }

    /// Remaining stock for an item, if it is part of the catalog.
    #[must_use]
    pub fn remaining(&self, id: &ItemId) -> Option<i64> {
        self.remaining.get(id).copied()
    }

    /// Whether an item has stock left.
    #[must_use]
    pub fn in_stock(&self, id: &ItemId) -> bool {
        self.remaining(id).is_some_and(|stock| stock > 0)
    }

    /// Take `quantity` units off an item (negative values put stock back).
    pub(crate) fn consume(&mut self, id: &ItemId, quantity: i64) {
        if let Some(stock) = self.remaining.get_mut(id) {
            *stock -= quantity;
        }
    }
}
