//! Type-safe price representation using decimal arithmetic.
//!
//! All money in the storefront is ringgit with two decimal places. Prices are
//! kept as [`Decimal`] so that `8.50 × 2 + 1.00` is exactly `18.00`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// # Example
///
/// ```rust
/// use dapur_core::Price;
/// use rust_decimal::Decimal;
///
/// let nasi_lemak = Price::myr(Decimal::new(850, 2));
/// assert_eq!((nasi_lemak * 2).to_string(), "RM 17.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (ringgit, not sen).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a ringgit price.
    #[must_use]
    pub const fn myr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::MYR)
    }

    /// Create a ringgit price from a whole number of sen.
    #[must_use]
    pub fn from_sen(sen: i64) -> Self {
        Self::myr(Decimal::new(sen, 2))
    }

    /// A zero ringgit price.
    #[must_use]
    pub const fn zero() -> Self {
        Self::myr(Decimal::ZERO)
    }

    /// Amount rounded to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount.round_dp(2)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency_code.symbol(), self.rounded())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    MYR,
}

impl CurrencyCode {
    /// Display symbol used in order summaries.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::MYR => "RM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Price::myr(Decimal::new(25, 1)).to_string(), "RM 2.50");
        assert_eq!(Price::myr(Decimal::from(10)).to_string(), "RM 10.00");
    }

    #[test]
    fn test_from_sen() {
        assert_eq!(Price::from_sen(850).amount, Decimal::new(850, 2));
        assert_eq!(Price::from_sen(-100).amount, Decimal::new(-100, 2));
    }

    #[test]
    fn test_line_and_sum_arithmetic_is_exact() {
        let lines = [Price::from_sen(850) * 2, Price::from_sen(250) * 3];
        let subtotal: Price = lines.into_iter().sum();
        assert_eq!(subtotal.amount, Decimal::new(2450, 2));
        assert_eq!((subtotal + Price::from_sen(100)).to_string(), "RM 25.50");
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = core::iter::empty().sum();
        assert!(total.is_zero());
    }
}
