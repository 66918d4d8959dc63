//! Cart and inventory reconciliation for one shopping session.
//!
//! # Architecture
//!
//! [`ShopSession`] owns everything a shopper can change: the loaded catalog,
//! the [`InventoryLedger`] of remaining stock and the [`CartStore`]. It is an
//! ordinary value passed explicitly to whoever needs it, so every rule here is
//! testable without HTTP.
//!
//! Each operation takes `&mut self` and either applies all of its changes or
//! returns an error having changed nothing. A stock check and the matching
//! ledger move can therefore never be observed apart.
//!
//! # Stock rules
//!
//! - Adding an item is refused once the cart holds at least as many units as
//!   the ledger still shows for it.
//! - Inactive items cannot be added.
//! - Increasing a line is refused once the ledger shows no stock left.
//! - An update moves the ledger by the requested delta, even when the line is
//!   removed. Removing a line of 2 with a delta of -5 puts 5 units back, so
//!   the ledger can drift above the loaded stock over remove/re-add cycles.

pub mod cart;
pub mod ledger;

use dapur_core::ItemId;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogFilter, CatalogItem, CatalogOrigin, LoadedCatalog};

pub use cart::{CartLine, CartStore, CartTotals};
pub use ledger::InventoryLedger;

/// How many in-stock item names the recommendation prompt gets.
pub const RECOMMENDATION_ITEM_LIMIT: usize = 10;

/// A cart operation refused because of stock.
///
/// Display strings are the notices shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// The item is not part of the loaded catalog.
    #[error("Menu tidak dijumpai: {0}")]
    NotFound(ItemId),

    /// The item is listed as inactive.
    #[error("Maaf, menu ini tidak dijual hari ini.")]
    Inactive(ItemId),

    /// Add refused: the cart already holds all remaining stock.
    #[error("Maaf ya, stok untuk menu ini sudah habis!")]
    OutOfStock(ItemId),

    /// Increment refused: the ledger has no stock left.
    #[error("Alamak, stok tidak cukup lah!")]
    InsufficientStock(ItemId),
}

/// What an update did to a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum QuantityChange {
    /// No line (or no catalog item) for that id; nothing happened.
    Unchanged,
    /// The line now holds `quantity` units.
    Updated { quantity: u32 },
    /// The line dropped to zero and was removed.
    Removed,
}

/// An item as listed on the menu, with its live ledger stock.
#[derive(Debug, Clone, Serialize)]
pub struct MenuEntry<'a> {
    #[serde(flatten)]
    pub item: &'a CatalogItem,
    pub remaining: i64,
}

/// State of one shopping session.
#[derive(Debug, Clone)]
pub struct ShopSession {
    items: Vec<CatalogItem>,
    categories: Vec<String>,
    origin: CatalogOrigin,
    ledger: InventoryLedger,
    cart: CartStore,
}

impl ShopSession {
    /// Start a session over a freshly loaded catalog with an empty cart.
    #[must_use]
    pub fn new(catalog: LoadedCatalog) -> Self {
        Self {
            ledger: InventoryLedger::from_items(&catalog.items),
            items: catalog.items,
            categories: catalog.categories,
            origin: catalog.origin,
            cart: CartStore::default(),
        }
    }

    /// Whether the catalog came from the embedded fallback.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.origin, CatalogOrigin::Fallback { .. })
    }

    #[must_use]
    pub const fn origin(&self) -> &CatalogOrigin {
        &self.origin
    }

    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub const fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Menu entries matching `filter`, with remaining stock from the ledger.
    #[must_use]
    pub fn menu(&self, filter: &CatalogFilter) -> Vec<MenuEntry<'_>> {
        self.items
            .iter()
            .filter(|item| filter.matches(item))
            .map(|item| MenuEntry {
                item,
                remaining: self.ledger.remaining(&item.id).unwrap_or(item.stock),
            })
            .collect()
    }

    /// Names of items the ledger still has stock for, in catalog order.
    #[must_use]
    pub fn in_stock_names(&self, limit: usize) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| self.ledger.in_stock(&item.id))
            .take(limit)
            .map(|item| item.name.clone())
            .collect()
    }

    /// Add one unit of an item to the cart.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// - [`StockError::NotFound`] if the id is not in the catalog
    /// - [`StockError::Inactive`] if the item is not active
    /// - [`StockError::OutOfStock`] if the cart already holds at least as many
    ///   units as the ledger shows remaining
    pub fn add_item(&mut self, id: &ItemId) -> Result<u32, StockError> {
        let item = self
            .items
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| StockError::NotFound(id.clone()))?;
        if !item.is_active() {
            return Err(StockError::Inactive(id.clone()));
        }

        let in_cart = i64::from(self.cart.quantity_of(id));
        let remaining = self.ledger.remaining(id).unwrap_or(0);
        if in_cart >= remaining {
            return Err(StockError::OutOfStock(id.clone()));
        }

        let quantity = self.cart.increment(item);
        self.ledger.consume(id, 1);
        Ok(quantity)
    }

    /// Change a cart line by `delta` units.
    ///
    /// A result of zero or less removes the line. Either way the ledger moves
    /// by `delta` itself, not by the units the cart actually gained or lost.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::InsufficientStock`] if `delta` is positive and the
    /// ledger shows no stock left.
    pub fn update_quantity(
        &mut self,
        id: &ItemId,
        delta: i32,
    ) -> Result<QuantityChange, StockError> {
        let Some(current) = self.cart.line(id).map(|line| line.quantity) else {
            return Ok(QuantityChange::Unchanged);
        };
        let Some(remaining) = self.ledger.remaining(id) else {
            return Ok(QuantityChange::Unchanged);
        };

        if delta > 0 && remaining <= 0 {
            return Err(StockError::InsufficientStock(id.clone()));
        }

        let target = i64::from(current) + i64::from(delta);
        let quantity = u32::try_from(target.max(0)).unwrap_or(u32::MAX);
        self.cart.set_quantity(id, quantity);
        self.ledger.consume(id, i64::from(delta));

        Ok(if quantity == 0 {
            QuantityChange::Removed
        } else {
            QuantityChange::Updated { quantity }
        })
    }

    /// Take checked-out quantities off the cart. Ledger stock is left as it is.
    ///
    /// Only the given quantities leave, so anything added after the order was
    /// snapshotted stays in the cart.
    pub(crate) fn remove_ordered<'a>(
        &mut self,
        ordered: impl IntoIterator<Item = (&'a ItemId, u32)>,
    ) {
        for (id, quantity) in ordered {
            let held = self.cart.quantity_of(id);
            self.cart.set_quantity(id, held.saturating_sub(quantity));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dapur_core::{DeliveryZone, ItemStatus, Price};

    use super::*;

    fn session() -> ShopSession {
        ShopSession::new(LoadedCatalog::fallback("test"))
    }

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw)
    }

    /// A session whose only item has the given stock.
    fn session_with_stock(stock: i64) -> ShopSession {
        let mut catalog = LoadedCatalog::fallback("test");
        catalog.items.truncate(1);
        if let Some(item) = catalog.items.first_mut() {
            item.stock = stock;
        }
        ShopSession::new(catalog)
    }

    #[test]
    fn test_add_moves_cart_and_ledger_together() {
        let mut session = session();

        assert_eq!(session.add_item(&id("m1")), Ok(1));
        assert_eq!(session.add_item(&id("m1")), Ok(2));

        assert_eq!(session.cart().quantity_of(&id("m1")), 2);
        assert_eq!(session.ledger().remaining(&id("m1")), Some(13));
    }

    #[test]
    fn test_add_unknown_item_is_not_found() {
        let mut session = session();
        assert_eq!(
            session.add_item(&id("zz")),
            Err(StockError::NotFound(id("zz")))
        );
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_add_refused_when_cart_reaches_remaining() {
        let mut session = session_with_stock(2);

        assert_eq!(session.add_item(&id("m1")), Ok(1));
        // cart holds 1, ledger shows 1 remaining
        assert_eq!(
            session.add_item(&id("m1")),
            Err(StockError::OutOfStock(id("m1")))
        );
        assert_eq!(session.cart().quantity_of(&id("m1")), 1);
        assert_eq!(session.ledger().remaining(&id("m1")), Some(1));
    }

    #[test]
    fn test_add_refused_on_zero_stock() {
        let mut session = session_with_stock(0);
        let err = session.add_item(&id("m1")).unwrap_err();
        assert_eq!(err.to_string(), "Maaf ya, stok untuk menu ini sudah habis!");
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_increment_until_ledger_empty() {
        let mut session = session_with_stock(3);
        session.add_item(&id("m1")).unwrap();

        assert_eq!(
            session.update_quantity(&id("m1"), 1),
            Ok(QuantityChange::Updated { quantity: 2 })
        );
        assert_eq!(
            session.update_quantity(&id("m1"), 1),
            Ok(QuantityChange::Updated { quantity: 3 })
        );
        assert_eq!(session.ledger().remaining(&id("m1")), Some(0));

        assert_eq!(
            session.update_quantity(&id("m1"), 1),
            Err(StockError::InsufficientStock(id("m1")))
        );
        assert_eq!(session.cart().quantity_of(&id("m1")), 3);
    }

    #[test]
    fn test_decrement_to_zero_removes_line_and_restores_stock() {
        let mut session = session();
        session.add_item(&id("m3")).unwrap();

        assert_eq!(
            session.update_quantity(&id("m3"), -1),
            Ok(QuantityChange::Removed)
        );
        assert!(session.cart().line(&id("m3")).is_none());
        assert_eq!(session.ledger().remaining(&id("m3")), Some(50));
    }

    #[test]
    fn test_large_negative_delta_moves_ledger_by_delta() {
        let mut session = session();
        session.add_item(&id("m4")).unwrap();
        session.add_item(&id("m4")).unwrap();
        assert_eq!(session.ledger().remaining(&id("m4")), Some(28));

        assert_eq!(
            session.update_quantity(&id("m4"), -5),
            Ok(QuantityChange::Removed)
        );
        assert!(session.cart().line(&id("m4")).is_none());
        assert_eq!(session.ledger().remaining(&id("m4")), Some(33));
    }

    #[test]
    fn test_repeated_add_remove_drifts_ledger_up() {
        let mut session = session();
        for _ in 0..10 {
            session.add_item(&id("m2")).unwrap();
            session.update_quantity(&id("m2"), -3).unwrap();
        }
        assert!(session.cart().is_empty());
        // each cycle takes 1 and puts 3 back
        assert_eq!(session.ledger().remaining(&id("m2")), Some(30));
    }

    #[test]
    fn test_add_inactive_item_is_refused() {
        let mut catalog = LoadedCatalog::fallback("test");
        if let Some(item) = catalog.items.first_mut() {
            item.status = ItemStatus::Inactive;
        }
        let mut session = ShopSession::new(catalog);

        assert_eq!(
            session.add_item(&id("m1")),
            Err(StockError::Inactive(id("m1")))
        );
        assert!(session.cart().is_empty());
        assert_eq!(session.ledger().remaining(&id("m1")), Some(15));
    }

    #[test]
    fn test_update_without_line_is_noop() {
        let mut session = session();
        assert_eq!(
            session.update_quantity(&id("m1"), 1),
            Ok(QuantityChange::Unchanged)
        );
        assert_eq!(session.ledger().remaining(&id("m1")), Some(15));
    }

    #[test]
    fn test_cart_never_exceeds_loaded_stock() {
        let mut session = session_with_stock(5);
        let target = id("m1");

        for step in 0..40 {
            let before = session.ledger().remaining(&target).unwrap();
            let result = if step % 3 == 2 {
                session.update_quantity(&target, -1).map(|_| ())
            } else if step % 2 == 0 {
                session.add_item(&target).map(|_| ())
            } else {
                session.update_quantity(&target, 1).map(|_| ())
            };

            let quantity = i64::from(session.cart().quantity_of(&target));
            let after = session.ledger().remaining(&target).unwrap();
            if result.is_err() {
                assert_eq!(before, after);
            }
            assert!(quantity <= 5);
            assert!(after >= 0);
            assert_eq!(after + quantity, 5);
            assert!(session.cart().lines().iter().all(|line| line.quantity >= 1));
        }
    }

    #[test]
    fn test_menu_shows_ledger_stock() {
        let mut session = session();
        session.add_item(&id("m5")).unwrap();

        let menu = session.menu(&CatalogFilter {
            category: Some("Pencuci Mulut".to_string()),
            query: String::new(),
        });

        assert_eq!(menu.len(), 1);
        assert_eq!(menu.first().unwrap().remaining, 19);
        assert_eq!(menu.first().unwrap().item.stock, 20);
    }

    #[test]
    fn test_in_stock_names_skip_sold_out() {
        let mut session = session_with_stock(1);
        assert_eq!(session.in_stock_names(RECOMMENDATION_ITEM_LIMIT).len(), 1);

        session.add_item(&id("m1")).unwrap();
        assert!(session.in_stock_names(RECOMMENDATION_ITEM_LIMIT).is_empty());
    }

    #[test]
    fn test_totals_match_worked_example() {
        let mut session = session();
        session.add_item(&id("m1")).unwrap();
        session.add_item(&id("m1")).unwrap();

        let totals = session.cart().totals(DeliveryZone::Residen1);
        assert_eq!(totals.grand_total, Price::from_sen(1800));
    }

    #[test]
    fn test_remove_ordered_keeps_ledger_and_later_lines() {
        let mut session = session();
        session.add_item(&id("m1")).unwrap();
        session.add_item(&id("m1")).unwrap();
        let ordered = id("m1");
        session.add_item(&id("m3")).unwrap();
        session.add_item(&id("m1")).unwrap();

        session.remove_ordered([(&ordered, 2)]);

        assert_eq!(session.cart().quantity_of(&id("m1")), 1);
        assert_eq!(session.cart().quantity_of(&id("m3")), 1);
        assert_eq!(session.ledger().remaining(&id("m1")), Some(12));
    }

    #[test]
    fn test_remove_ordered_drops_lines_already_lowered() {
        let mut session = session();
        session.add_item(&id("m5")).unwrap();
        let ordered = id("m5");

        session.remove_ordered([(&ordered, 3)]);

        assert!(session.cart().is_empty());
    }
}
