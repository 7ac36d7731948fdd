//! Type-safe price representation using decimal arithmetic.
//!
//! Money never touches binary floating point. Amounts are `rust_decimal`
//! values in the currency's standard unit and every computed result is
//! rounded to two places with round-half-up (`MidpointAwayFromZero`).
//!
//! ```
//! use delights_core::{CurrencyCode, Price};
//! use rust_decimal::Decimal;
//!
//! let dorayaki = Price::from_cents(350, CurrencyCode::USD);
//! assert_eq!(dorayaki.times(2).display(), "$7.00");
//! assert_eq!(Price::zero(CurrencyCode::USD).amount, Decimal::ZERO);
//! ```

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept for every currency we sell in.
pub const MINOR_UNIT_PLACES: u32 = 2;

/// Errors that can occur when building or combining a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount could not be parsed as a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
    /// Two prices in different currencies were combined.
    #[error("cannot combine {left:?} with {right:?}")]
    CurrencyMismatch {
        /// Currency of the running amount.
        left: CurrencyCode,
        /// Currency of the amount being added.
        right: CurrencyCode,
    },
}

/// A non-negative price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price, rounding the amount to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self {
            amount: round_money(amount),
            currency_code,
        })
    }

    /// Create a price from an amount in minor units (e.g., cents).
    #[must_use]
    pub fn from_cents(cents: u64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::from(cents) / Decimal::ONE_HUNDRED,
            currency_code,
        }
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Parse a price such as `"12.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a decimal number or is negative.
    pub fn parse(s: &str, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|_| PriceError::InvalidAmount(s.to_owned()))?;
        Self::new(amount, currency_code)
    }

    /// Multiply by a quantity, rounding the result.
    ///
    /// Saturates at `Decimal::MAX` rather than overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        let amount = self
            .amount
            .checked_mul(Decimal::from(quantity))
            .unwrap_or(Decimal::MAX);
        Self {
            amount: round_money(amount),
            currency_code: self.currency_code,
        }
    }

    /// Add another price in the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::CurrencyMismatch`] when the currencies differ.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: other.currency_code,
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .unwrap_or(Decimal::MAX);
        Ok(Self {
            amount: round_money(amount),
            currency_code: self.currency_code,
        })
    }

    /// Sum an iterator of prices, starting from zero in `currency_code`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::CurrencyMismatch`] if any price is in a
    /// different currency.
    pub fn sum<I>(prices: I, currency_code: CurrencyCode) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = Self>,
    {
        prices
            .into_iter()
            .try_fold(Self::zero(currency_code), Self::checked_add)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            round_money(self.amount)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Round to two decimal places, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY => "¥",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::JPY => "JPY",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(s: &str) -> Price {
        Price::parse(s, CurrencyCode::USD).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(usd("12.99").display(), "$12.99");
        assert_eq!(usd("10").display(), "$10.00");
        assert_eq!(usd(" 4.2 ").display(), "$4.20");
    }

    #[test]
    fn test_parse_rejects_negative_and_garbage() {
        assert_eq!(
            Price::parse("-1.00", CurrencyCode::USD),
            Err(PriceError::Negative)
        );
        assert!(matches!(
            Price::parse("dorayaki", CurrencyCode::USD),
            Err(PriceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_new_rounds_half_up() {
        let price = Price::new(Decimal::new(10_005, 3), CurrencyCode::USD).unwrap();
        assert_eq!(price.amount, Decimal::new(1001, 2));
        let price = Price::new(Decimal::new(10_004, 3), CurrencyCode::USD).unwrap();
        assert_eq!(price.amount, Decimal::new(1000, 2));
    }

    #[test]
    fn test_times_is_exact_for_cents() {
        // 0.1 + 0.2 style drift must not appear
        assert_eq!(usd("2.80").times(3), usd("8.40"));
        assert_eq!(usd("4.99").times(0), usd("0"));
    }

    #[test]
    fn test_sum_and_currency_mismatch() {
        let total = Price::sum([usd("3.50"), usd("4.20")], CurrencyCode::USD).unwrap();
        assert_eq!(total, usd("7.70"));

        let yen = Price::from_cents(100, CurrencyCode::JPY);
        assert!(matches!(
            usd("1").checked_add(yen),
            Err(PriceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1299, CurrencyCode::USD), usd("12.99"));
    }

    #[test]
    fn test_serde_roundtrip_keeps_decimal_string() {
        let price = usd("15.50");
        let json = serde_json::to_string(&price).unwrap();
        assert!(json.contains("\"15.50\""));
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
