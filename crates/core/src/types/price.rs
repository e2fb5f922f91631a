//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// The amount is carried in the currency's standard unit (rupees, not
/// paise). Conversion to the gateway's minor unit happens only at the
/// payment handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// A zero price in the given currency.
    #[must_use]
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// The amount in the currency's minor unit (paise for INR), rounded
    /// to the nearest unit. This is what Razorpay expects.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        (self.amount * Decimal::from(100)).round().to_i64().unwrap_or(0)
    }

    /// Format for display, e.g. `₹1,299.00` formatted as `₹1299.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl CurrencyCode {
    /// The display symbol for this currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Inr => "₹",
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
        }
    }

    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units() {
        let price = Price::new(Decimal::new(129_950, 2), CurrencyCode::Inr);
        assert_eq!(price.minor_units(), 129_950);

        let price = Price::new(Decimal::new(10, 0), CurrencyCode::Inr);
        assert_eq!(price.minor_units(), 1000);
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(49_900, 2), CurrencyCode::Inr);
        assert_eq!(price.display(), "₹499.00");
    }

    #[test]
    fn test_zero() {
        let price = Price::zero(CurrencyCode::Inr);
        assert_eq!(price.minor_units(), 0);
        assert_eq!(price.display(), "₹0.00");
    }

    #[test]
    fn test_currency_serde_uppercase() {
        let json = serde_json::to_string(&CurrencyCode::Inr).expect("serialize");
        assert_eq!(json, "\"INR\"");
        let code: CurrencyCode = serde_json::from_str("\"USD\"").expect("deserialize");
        assert_eq!(code, CurrencyCode::Usd);
    }

    #[test]
    fn test_price_serde_amount_as_string() {
        // rust_decimal's serde-with-str keeps amounts exact on the wire
        let price = Price::new(Decimal::new(129_900, 2), CurrencyCode::Inr);
        let json = serde_json::to_value(&price).expect("serialize");
        assert_eq!(json["amount"], "1299.00");
        assert_eq!(json["currency"], "INR");
    }
}
