//! Cart lines and derived totals.

use dapur_core::{DeliveryZone, ItemId, Price};
use serde::Serialize;

use crate::catalog::CatalogItem;

/// One item in the cart.
///
/// `item` is a snapshot taken when the line was created; later catalog
/// changes do not reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub item: CatalogItem,
    /// Always at least 1; a line that would reach 0 is removed instead.
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price * self.quantity
    }
}

/// Subtotal, delivery fee and grand total for a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub grand_total: Price,
}

/// Requested quantities, one line per item, in the order items were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item.id == id)
    }

    /// Quantity held for an item (0 when absent).
    #[must_use]
    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.line(id).map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn totals(&self, zone: DeliveryZone) -> CartTotals {
        let subtotal = self.subtotal();
        let delivery_fee = zone.fee();
        CartTotals {
            subtotal,
            delivery_fee,
            grand_total: subtotal + delivery_fee,
        }
    }

    /// Add one unit, creating the line from `item` if needed.
    pub(crate) fn increment(&mut self, item: &CatalogItem) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == item.id) {
            line.quantity += 1;
            return line.quantity;
        }
        self.lines.push(CartLine {
            item: item.clone(),
            quantity: 1,
        });
        1
    }

    /// Set an existing line's quantity; 0 removes the line.
    pub(crate) fn set_quantity(&mut self, id: &ItemId, quantity: u32) {
        if quantity == 0 {
            self.lines.retain(|line| &line.item.id != id);
        } else if let Some(line) = self.lines.iter_mut().find(|line| &line.item.id == id) {
            line.quantity = quantity;
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::fallback;

    fn item(index: usize) -> CatalogItem {
        fallback::menu().0.remove(index)
    }

    #[test]
    fn test_increment_creates_then_grows_line() {
        let mut cart = CartStore::default();
        let nasi = item(0);

        assert_eq!(cart.increment(&nasi), 1);
        assert_eq!(cart.increment(&nasi), 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(&nasi.id), 2);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = CartStore::default();
        let teh = item(2);
        cart.increment(&teh);

        cart.set_quantity(&teh.id, 0);

        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(&teh.id), 0);
    }

    #[test]
    fn test_totals_for_residen1() {
        let mut cart = CartStore::default();
        let nasi = item(0);
        cart.increment(&nasi);
        cart.increment(&nasi);

        let totals = cart.totals(DeliveryZone::Residen1);

        assert_eq!(totals.subtotal, Price::from_sen(1700));
        assert_eq!(totals.delivery_fee, Price::from_sen(100));
        assert_eq!(totals.grand_total, Price::from_sen(1800));
        assert_eq!(totals.grand_total.to_string(), "RM 18.00");
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = CartStore::default();
        cart.increment(&item(4));
        cart.increment(&item(1));
        cart.increment(&item(4));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.item.id.as_str()).collect();
        assert_eq!(ids, vec!["m5", "m2"]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_snapshot_is_independent_of_catalog() {
        let mut cart = CartStore::default();
        let mut kuih = item(4);
        cart.increment(&kuih);

        kuih.price = Price::from_sen(9900);

        assert_eq!(cart.lines()[0].item.price, Price::from_sen(400));
    }
}
