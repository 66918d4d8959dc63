//! WhatsApp order summary and deep link.

use std::fmt::Write as _;

use serde::Serialize;

use super::order::Order;

const WHATSAPP_BASE: &str = "https://wa.me";

/// Summary text plus the link that opens it in the messaging app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagingHandoff {
    pub summary: String,
    pub url: String,
}

/// Builds the messaging handoff for a store's WhatsApp number.
#[derive(Debug, Clone)]
pub struct WhatsAppHandoff {
    target: String,
    store_name: String,
}

impl WhatsAppHandoff {
    /// `target` is the digits-only number the message is addressed to.
    #[must_use]
    pub fn new(target: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            store_name: store_name.into(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn build(&self, order: &Order) -> MessagingHandoff {
        let summary = self.summary(order);
        let url = format!(
            "{WHATSAPP_BASE}/{}?text={}",
            self.target,
            urlencoding::encode(&summary)
        );
        MessagingHandoff { summary, url }
    }

    /// Human-readable order summary, formatted with WhatsApp bold markers.
    #[must_use]
    pub fn summary(&self, order: &Order) -> String {
        let mut text = format!(
            "*PESANAN ONLINE - {}*\n\n\
             Nama Pelanggan: {}\n\
             Alamat/Kawasan: {}\n\
             Cara Bayaran: {}\n\n\
             *Senarai Pesanan:*\n",
            self.store_name.to_uppercase(),
            order.customer_name,
            order.address,
            order.payment_label(),
        );

        let lines: Vec<String> = order
            .lines
            .iter()
            .map(|line| {
                format!(
                    "- {} (x{}) ... RM {:.2}",
                    line.name,
                    line.quantity,
                    line.line_total().amount
                )
            })
            .collect();
        text.push_str(&lines.join("\n"));

        // Writing into a String cannot fail.
        let _ = write!(
            text,
            "\n\n*JUMLAH BESAR: RM {:.2}*\n\nTerima kasih kerana menyokong {}! \u{2764}\u{fe0f}",
            order.grand_total.amount, self.store_name
        );
        text
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dapur_core::{DeliveryZone, ItemId, PaymentMethod};

    use super::*;
    use crate::catalog::LoadedCatalog;
    use crate::checkout::CheckoutForm;
    use crate::shop::ShopSession;

    fn order() -> Order {
        let mut session = ShopSession::new(LoadedCatalog::fallback("test"));
        session.add_item(&ItemId::new("m1")).unwrap();
        session.add_item(&ItemId::new("m1")).unwrap();
        session.add_item(&ItemId::new("m3")).unwrap();
        Order::snapshot(
            session.cart(),
            &CheckoutForm {
                customer_name: "Siti".to_string(),
                address: "Blok C-3-2".to_string(),
                zone: DeliveryZone::Residen1,
                payment: PaymentMethod::Cash,
            },
        )
    }

    #[test]
    fn test_summary_layout() {
        let handoff = WhatsAppHandoff::new("60123456789", "Dapur Mommy");

        let summary = handoff.summary(&order());

        assert_eq!(
            summary,
            "*PESANAN ONLINE - DAPUR MOMMY*\n\n\
             Nama Pelanggan: Siti\n\
             Alamat/Kawasan: RESIDEN1, Blok C-3-2\n\
             Cara Bayaran: Tunai (COD)\n\n\
             *Senarai Pesanan:*\n\
             - Nasi Lemak Ayam Berempah (x2) ... RM 17.00\n\
             - Teh Tarik Kaw (x1) ... RM 2.50\n\n\
             *JUMLAH BESAR: RM 20.50*\n\n\
             Terima kasih kerana menyokong Dapur Mommy! \u{2764}\u{fe0f}"
        );
    }

    #[test]
    fn test_url_targets_number_and_encodes_text() {
        let handoff = WhatsAppHandoff::new("60123456789", "Dapur Mommy");

        let built = handoff.build(&order());

        assert!(built.url.starts_with("https://wa.me/60123456789?text=%2APESANAN%20ONLINE"));
        assert!(!built.url.contains('\n'));
        assert!(!built.url.contains(' '));
        let encoded = built.url.split_once("?text=").unwrap().1;
        assert_eq!(urlencoding::decode(encoded).unwrap(), built.summary);
    }
}
