//! Pricing
//!
//! The totals calculator. Cart totals are always derived from the full set of
//! line items in one pass; nothing adjusts them incrementally.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, INR},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartItem,
    money::{Price, serde_price, zero},
};

/// Errors raised when building a [`PricingPolicy`].
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    /// Tax rate outside `0..=1`.
    #[error("tax rate must be between 0 and 1, got {0}")]
    TaxRateOutOfRange(Decimal),

    /// A threshold or fee was negative.
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    /// Threshold or fee priced in another currency (field, found, expected).
    #[error("{0} is in {1}, but the policy currency is {2}")]
    CurrencyMismatch(&'static str, &'static str, &'static str),
}

/// Business rules applied when totalling a cart.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    currency: &'static Currency,
    tax_rate: Percentage,
    free_shipping_threshold: Price,
    flat_shipping_fee: Price,
}

impl PricingPolicy {
    /// Create a policy. The currency is taken from the threshold.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if the tax rate is outside `0..=1`, if either
    /// amount is negative, or if the amounts are in different currencies.
    pub fn new(
        tax_rate: Percentage,
        free_shipping_threshold: Price,
        flat_shipping_fee: Price,
    ) -> Result<Self, PolicyError> {
        let rate = tax_rate * Decimal::ONE;

        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(PolicyError::TaxRateOutOfRange(rate));
        }

        if free_shipping_threshold.to_minor_units() < 0 {
            return Err(PolicyError::NegativeAmount("free shipping threshold"));
        }

        if flat_shipping_fee.to_minor_units() < 0 {
            return Err(PolicyError::NegativeAmount("flat shipping fee"));
        }

        let currency = free_shipping_threshold.currency();

        if flat_shipping_fee.currency() != currency {
            return Err(PolicyError::CurrencyMismatch(
                "flat shipping fee",
                flat_shipping_fee.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        Ok(Self {
            currency,
            tax_rate,
            free_shipping_threshold,
            flat_shipping_fee,
        })
    }

    /// Currency every cart under this policy is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Flat consumption-tax rate.
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Subtotals strictly above this ship free.
    pub fn free_shipping_threshold(&self) -> Price {
        self.free_shipping_threshold
    }

    /// Shipping charged at or below the threshold.
    pub fn flat_shipping_fee(&self) -> Price {
        self.flat_shipping_fee
    }

    /// Tax in minor units, rounded half away from zero.
    fn tax_on(&self, subtotal_minor: i64) -> i64 {
        (self.tax_rate * Decimal::ONE)
            .checked_mul(Decimal::from(subtotal_minor))
            .map(|tax| tax.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|tax| tax.to_i64())
            .unwrap_or(i64::MAX)
    }

    fn shipping_on(&self, subtotal_minor: i64) -> i64 {
        if subtotal_minor > self.free_shipping_threshold.to_minor_units() {
            0
        } else {
            self.flat_shipping_fee.to_minor_units()
        }
    }
}

impl Default for PricingPolicy {
    /// 18% tax, free shipping above 8000 INR, otherwise a flat 500 INR.
    fn default() -> Self {
        Self {
            currency: INR,
            tax_rate: Percentage::from(Decimal::new(18, 2)),
            free_shipping_threshold: Money::from_minor(800_000, INR),
            flat_shipping_fee: Money::from_minor(50_000, INR),
        }
    }
}

/// Derived financial fields of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of unit price times quantity over all line items
    #[serde(with = "serde_price")]
    pub subtotal: Price,

    /// Tax on the subtotal
    #[serde(with = "serde_price")]
    pub tax: Price,

    /// Shipping charge
    #[serde(with = "serde_price")]
    pub shipping: Price,

    /// Subtotal plus tax plus shipping
    #[serde(with = "serde_price")]
    pub total: Price,
}

impl Totals {
    /// All-zero totals in the given currency.
    pub fn zero(currency: &'static Currency) -> Self {
        Self {
            subtotal: zero(currency),
            tax: zero(currency),
            shipping: zero(currency),
            total: zero(currency),
        }
    }

    /// Compute totals for a set of line items.
    ///
    /// An empty set of items totals to zero across the board, shipping
    /// included. Line items are assumed to be priced in the policy currency;
    /// the store refuses to admit anything else.
    pub fn compute(items: &[CartItem], policy: &PricingPolicy) -> Self {
        if items.is_empty() {
            return Self::zero(policy.currency());
        }

        let subtotal = items
            .iter()
            .map(CartItem::line_total_minor)
            .fold(0_i64, i64::saturating_add);

        let tax = policy.tax_on(subtotal);
        let shipping = policy.shipping_on(subtotal);
        let total = subtotal.saturating_add(tax).saturating_add(shipping);

        let currency = policy.currency();

        Self {
            subtotal: Money::from_minor(subtotal, currency),
            tax: Money::from_minor(tax, currency),
            shipping: Money::from_minor(shipping, currency),
            total: Money::from_minor(total, currency),
        }
    }
}
