//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
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

    /// A whole-dollar amount in Australian dollars.
    #[must_use]
    pub const fn aud(whole: u32) -> Self {
        Self::new(Decimal::from_parts(whole, 0, 0, false, 0), CurrencyCode::AUD)
    }

    /// Whole-number percentage saved relative to `compare_at`, rounded down.
    ///
    /// Returns `None` when the currencies differ or `compare_at` is not higher.
    #[must_use]
    pub fn percent_off(&self, compare_at: &Self) -> Option<u32> {
        if self.currency_code != compare_at.currency_code || compare_at.amount <= self.amount {
            return None;
        }
        let saved = (compare_at.amount - self.amount) * Decimal::ONE_HUNDRED / compare_at.amount;
        saved.floor().to_u32()
    }
}

impl fmt::Display for Price {
    /// Formats as e.g. `A$25` or `A$24.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.currency_code.symbol();
        if self.amount.fract().is_zero() {
            write!(f, "{symbol}{}", self.amount.trunc())
        } else {
            write!(f, "{symbol}{:.2}", self.amount)
        }
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    AUD,
    USD,
}

impl CurrencyCode {
    /// Display prefix used on the site.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::AUD => "A$",
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_and_fractional() {
        assert_eq!(Price::aud(25).to_string(), "A$25");
        assert_eq!(Price::aud(3000).to_string(), "A$3000");

        let fractional = Price::new(Decimal::new(2450, 2), CurrencyCode::AUD);
        assert_eq!(fractional.to_string(), "A$24.50");
    }

    #[test]
    fn test_percent_off_rounds_down() {
        assert_eq!(Price::aud(25).percent_off(&Price::aud(50)), Some(50));
        assert_eq!(Price::aud(500).percent_off(&Price::aud(3000)), Some(83));
    }

    #[test]
    fn test_percent_off_requires_higher_compare_price() {
        assert_eq!(Price::aud(50).percent_off(&Price::aud(50)), None);
        assert_eq!(Price::aud(50).percent_off(&Price::aud(25)), None);

        let usd = Price::new(Decimal::from(100), CurrencyCode::USD);
        assert_eq!(Price::aud(50).percent_off(&usd), None);
    }
}
