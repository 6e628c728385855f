//! Money
//!
//! Prices are held as [`rusty_money::Money`] in integer minor units. The
//! textual form used by fixtures and snapshots is `"AMOUNT CURRENCY"`, e.g.
//! `"7500 INR"` or `"2.99 GBP"`.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use thiserror::Error;

/// A monetary amount in one of the store's supported currencies.
pub type Price = Money<'static, Currency>;

/// Number of decimal places in the minor unit of every supported currency.
const MINOR_UNIT_SCALE: u32 = 2;

/// Errors raised while parsing prices and currencies.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The price string was not in the `AMOUNT CURRENCY` format.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// The currency code is not one the store trades in.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported currency by its ISO alpha code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for codes outside INR, GBP, USD and EUR.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PriceError> {
    match code {
        "INR" => Ok(INR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Convert a major-unit amount (e.g. `7500` or `2.99`) into minor units.
///
/// Returns `None` if the amount has digits below the minor unit (`2.995`) or
/// does not fit in an `i64`. Trailing zeros (`2.990`) are fine.
pub fn major_to_minor(amount: Decimal) -> Option<i64> {
    if amount.normalize().scale() > MINOR_UNIT_SCALE {
        return None;
    }

    amount
        .checked_mul(Decimal::from(10_i64.pow(MINOR_UNIT_SCALE)))
        .and_then(|value| value.to_i64())
}

/// Build a price from a major-unit amount.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPrice`] if the amount is finer than the minor
/// unit or does not fit in minor units.
pub fn price_from_major(amount: Decimal, currency: &'static Currency) -> Result<Price, PriceError> {
    let minor = major_to_minor(amount).ok_or_else(|| PriceError::InvalidPrice(amount.to_string()))?;

    Ok(Money::from_minor(minor, currency))
}

/// Parse a price string (e.g. `"2499 INR"`).
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`,
/// if the amount is not a decimal number, or if the currency is unsupported.
pub fn parse_price(s: &str) -> Result<Price, PriceError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    price_from_major(amount, currency_from_code(code)?)
}

/// Render a price in the same `AMOUNT CURRENCY` form [`parse_price`] accepts.
pub fn format_price(price: &Price) -> String {
    format!(
        "{} {}",
        Decimal::new(price.to_minor_units(), MINOR_UNIT_SCALE),
        price.currency().iso_alpha_code
    )
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}

/// Serde adapter storing a [`Price`] as an `AMOUNT CURRENCY` string.
pub mod serde_price {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::{Price, format_price, parse_price};

    /// Serialize a price as a string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(price: &Price, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_price(price))
    }

    /// Deserialize a price from a string.
    ///
    /// # Errors
    ///
    /// Fails if the string is not a valid price.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
        let raw = String::deserialize(deserializer)?;

        parse_price(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for optional prices.
pub mod serde_price_opt {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::{Price, format_price, parse_price};

    /// Serialize an optional price as a string or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        price: &Option<Price>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match price {
            Some(price) => serializer.serialize_some(&format_price(price)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional price.
    ///
    /// # Errors
    ///
    /// Fails if a present value is not a valid price.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Price>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_price(&raw).map_err(D::Error::custom))
            .transpose()
    }
}
