//! Order record and its wire payload.

use dapur_core::{DeliveryZone, ItemId, PaymentMethod, Price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shop::{CartLine, CartStore};

/// Checkout form fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutForm {
    #[serde(rename = "nama")]
    pub customer_name: String,
    /// Free-text address; ignored for self pickup.
    #[serde(rename = "alamat", default)]
    pub address: String,
    #[serde(rename = "kawasan", default)]
    pub zone: DeliveryZone,
    #[serde(rename = "pembayaran", default)]
    pub payment: PaymentMethod,
}

/// One ordered item, copied from its cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub name: String,
    pub price: Price,
    pub original_price: Price,
    pub quantity: u32,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item.id.clone(),
            name: line.item.name.clone(),
            price: line.item.price,
            original_price: line.item.original_price,
            quantity: line.quantity,
        }
    }
}

/// A finalized order, snapshotted from the cart at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub customer_name: String,
    /// Resolved address (`ZONE, free text` or the self pickup sentinel).
    pub address: String,
    pub zone: DeliveryZone,
    pub payment: PaymentMethod,
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub grand_total: Price,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Build an order from the cart contents as they are right now.
    #[must_use]
    pub fn snapshot(cart: &CartStore, form: &CheckoutForm) -> Self {
        let totals = cart.totals(form.zone);
        Self {
            customer_name: form.customer_name.trim().to_string(),
            address: form.zone.resolve_address(form.address.trim()),
            zone: form.zone,
            payment: form.payment,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            grand_total: totals.grand_total,
            lines: cart.lines().iter().map(OrderLine::from).collect(),
        }
    }

    #[must_use]
    pub const fn payment_label(&self) -> &'static str {
        self.payment.label()
    }

    /// Body sent to the order endpoint.
    #[must_use]
    pub fn payload(&self) -> OrderPayload<'_> {
        OrderPayload {
            action: "create_order",
            customer: &self.customer_name,
            address: &self.address,
            payment: self.payment_label(),
            total: self.grand_total.rounded(),
            items: self
                .lines
                .iter()
                .map(|line| OrderPayloadItem {
                    menu_id: &line.item_id,
                    name: &line.name,
                    price: line.price.amount,
                    original_price: line.original_price.amount,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// `create_order` request body, in the endpoint's field names.
#[derive(Debug, Serialize)]
pub struct OrderPayload<'a> {
    pub action: &'static str,
    #[serde(rename = "pelanggan")]
    pub customer: &'a str,
    #[serde(rename = "alamat")]
    pub address: &'a str,
    #[serde(rename = "bayaran")]
    pub payment: &'static str,
    #[serde(rename = "jumlah", with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "item")]
    pub items: Vec<OrderPayloadItem<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OrderPayloadItem<'a> {
    #[serde(rename = "menuId")]
    pub menu_id: &'a ItemId,
    #[serde(rename = "nama")]
    pub name: &'a str,
    #[serde(rename = "harga", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "harga_asal", with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dapur_core::{ItemId, SELF_PICKUP_ADDRESS};
    use serde_json::json;

    use super::*;
    use crate::catalog::LoadedCatalog;
    use crate::shop::ShopSession;

    fn form(zone: DeliveryZone) -> CheckoutForm {
        CheckoutForm {
            customer_name: "  Siti Aminah ".to_string(),
            address: "No 5, Jalan Kenanga".to_string(),
            zone,
            payment: PaymentMethod::Qr,
        }
    }

    fn session_with_nasi_lemak(quantity: u32) -> ShopSession {
        let mut session = ShopSession::new(LoadedCatalog::fallback("test"));
        for _ in 0..quantity {
            session.add_item(&ItemId::new("m1")).unwrap();
        }
        session
    }

    #[test]
    fn test_snapshot_resolves_address_and_totals() {
        let session = session_with_nasi_lemak(2);
        let order = Order::snapshot(session.cart(), &form(DeliveryZone::Residen1));

        assert_eq!(order.customer_name, "Siti Aminah");
        assert_eq!(order.address, "RESIDEN1, No 5, Jalan Kenanga");
        assert_eq!(order.payment_label(), "DuitNow QR / Transfer");
        assert_eq!(order.grand_total, Price::from_sen(1800));
        assert_eq!(order.lines.len(), 1);
    }

    #[test]
    fn test_self_pickup_has_no_fee() {
        let session = session_with_nasi_lemak(1);
        let order = Order::snapshot(session.cart(), &form(DeliveryZone::WalkIn));

        assert_eq!(order.address, SELF_PICKUP_ADDRESS);
        assert!(order.delivery_fee.is_zero());
        assert_eq!(order.grand_total, Price::from_sen(850));
    }

    #[test]
    fn test_payload_uses_endpoint_field_names() {
        let session = session_with_nasi_lemak(2);
        let order = Order::snapshot(session.cart(), &form(DeliveryZone::LainLain));

        let payload = serde_json::to_value(order.payload()).unwrap();

        assert_eq!(
            payload,
            json!({
                "action": "create_order",
                "pelanggan": "Siti Aminah",
                "alamat": "LAIN-LAIN, No 5, Jalan Kenanga",
                "bayaran": "DuitNow QR / Transfer",
                "jumlah": 19.0,
                "item": [{
                    "menuId": "m1",
                    "nama": "Nasi Lemak Ayam Berempah",
                    "harga": 8.5,
                    "harga_asal": 9.5,
                    "qty": 2
                }]
            })
        );
    }

    #[test]
    fn test_form_decodes_from_urlencoded_names() {
        let parsed: CheckoutForm = serde_json::from_value(json!({
            "nama": "Ali",
            "kawasan": "RESIDEN1",
            "pembayaran": "CASH"
        }))
        .unwrap();

        assert_eq!(parsed.zone, DeliveryZone::Residen1);
        assert_eq!(parsed.payment, PaymentMethod::Cash);
        assert!(parsed.address.is_empty());
    }
}
