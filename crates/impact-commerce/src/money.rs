//! Money type for billing amounts.
//!
//! Impact arithmetic works on `f64` euros, but anything that ends up on an
//! invoice is converted to integer cents first so monthly sums don't drift.

use crate::ImpactError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported billing currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
}

impl Currency {
    /// Get the currency code (e.g., "EUR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
        }
    }

    /// Get the currency symbol (e.g., "€").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
            Currency::GBP => "\u{00a3}",
            Currency::CHF => "CHF ",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "EUR" => Some(Currency::EUR),
            "USD" => Some(Currency::USD),
            "GBP" => Some(Currency::GBP),
            "CHF" => Some(Currency::CHF),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency, stored in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a euro value from cents.
    pub fn eur(amount_cents: i64) -> Self {
        Self::new(amount_cents, Currency::EUR)
    }

    /// Create a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// Non-finite input becomes zero.
    ///
    /// ```
    /// use impact_commerce::money::{Money, Currency};
    /// let fee = Money::from_decimal(0.275, Currency::EUR);
    /// assert_eq!(fee.amount_cents, 28);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        if !amount.is_finite() {
            return Self::zero(currency);
        }
        Self::new((amount * 100.0).round() as i64, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Format as a display string (e.g., "€49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Add another Money value, failing if currencies differ or the sum
    /// does not fit in cents.
    pub fn try_add(&self, other: &Money) -> Result<Money, ImpactError> {
        self.check_currency(other)?;
        let amount_cents = self
            .amount_cents
            .checked_add(other.amount_cents)
            .ok_or(ImpactError::AmountOverflow)?;
        Ok(Money::new(amount_cents, self.currency))
    }

    /// The larger of two values in the same currency.
    pub fn try_max(&self, other: &Money) -> Result<Money, ImpactError> {
        self.check_currency(other)?;
        Ok(if other.amount_cents > self.amount_cents {
            *other
        } else {
            *self
        })
    }

    /// Sum an iterator of Money values.
    pub fn sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, ImpactError> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    fn check_currency(&self, other: &Money) -> Result<(), ImpactError> {
        if self.currency != other.currency {
            return Err(ImpactError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
