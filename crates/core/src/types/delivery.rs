//! Delivery zones and payment methods selected at checkout.
//!
//! The zone decides both how the delivery address is written on the order and
//! the flat delivery fee. Fees are a static table:
//!
//! | Zone        | Label            | Fee     |
//! |-------------|------------------|---------|
//! | `WALK-IN`   | Ambil Sendiri    | RM 0.00 |
//! | `RESIDEN1`  | Residen 1        | RM 1.00 |
//! | `LAIN-LAIN` | Lain-lain        | RM 2.00 |

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Address written on orders collected at the kitchen.
pub const SELF_PICKUP_ADDRESS: &str = "AMBIL SENDIRI";

/// A form value that does not name a known zone or payment method.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Delivery area selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryZone {
    /// Customer collects the order (no address, no fee).
    #[default]
    #[serde(rename = "WALK-IN")]
    WalkIn,
    #[serde(rename = "RESIDEN1")]
    Residen1,
    #[serde(rename = "LAIN-LAIN")]
    LainLain,
}

impl DeliveryZone {
    /// All zones in the order the checkout form lists them.
    pub const ALL: [Self; 3] = [Self::WalkIn, Self::Residen1, Self::LainLain];

    /// Wire code, also used as the address prefix.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::WalkIn => "WALK-IN",
            Self::Residen1 => "RESIDEN1",
            Self::LainLain => "LAIN-LAIN",
        }
    }

    /// Flat delivery fee for the zone.
    #[must_use]
    pub fn fee(&self) -> Price {
        match self {
            Self::WalkIn => Price::zero(),
            Self::Residen1 => Price::from_sen(100),
            Self::LainLain => Price::from_sen(200),
        }
    }

    #[must_use]
    pub const fn is_self_pickup(&self) -> bool {
        matches!(self, Self::WalkIn)
    }

    /// Resolve the address written on the order.
    ///
    /// Self pickup ignores the free text entirely.
    #[must_use]
    pub fn resolve_address(&self, free_text: &str) -> String {
        if self.is_self_pickup() {
            SELF_PICKUP_ADDRESS.to_string()
        } else {
            format!("{}, {free_text}", self.code())
        }
    }
}

impl fmt::Display for DeliveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DeliveryZone {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.code() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "delivery zone",
                value: s.to_string(),
            })
    }
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// `DuitNow` QR or bank transfer.
    Qr,
}

impl PaymentMethod {
    /// Human-readable label recorded on the order.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Tunai (COD)",
            Self::Qr => "DuitNow QR / Transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(Self::Cash),
            "QR" => Ok(Self::Qr),
            _ => Err(UnknownVariant {
                kind: "payment method",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_fee_table() {
        assert!(DeliveryZone::WalkIn.fee().is_zero());
        assert_eq!(DeliveryZone::Residen1.fee().amount, Decimal::ONE);
        assert_eq!(DeliveryZone::LainLain.fee().amount, Decimal::from(2));
    }

    #[test]
    fn test_self_pickup_ignores_free_text() {
        assert_eq!(
            DeliveryZone::WalkIn.resolve_address("Jalan Mawar 3"),
            SELF_PICKUP_ADDRESS
        );
    }

    #[test]
    fn test_delivery_address_prefixes_zone_code() {
        assert_eq!(
            DeliveryZone::Residen1.resolve_address("Blok C-12-3"),
            "RESIDEN1, Blok C-12-3"
        );
    }

    #[test]
    fn test_zone_parse_and_serde_agree() {
        for zone in DeliveryZone::ALL {
            let json = serde_json::to_string(&zone).unwrap();
            assert_eq!(json, format!("\"{}\"", zone.code()));
            assert_eq!(zone.code().parse::<DeliveryZone>().unwrap(), zone);
        }
        assert!("RESIDEN2".parse::<DeliveryZone>().is_err());
    }

    #[test]
    fn test_payment_labels() {
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap().label(), "Tunai (COD)");
        assert_eq!(
            "QR".parse::<PaymentMethod>().unwrap().label(),
            "DuitNow QR / Transfer"
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"QR\"").unwrap(),
            PaymentMethod::Qr
        );
    }
}
