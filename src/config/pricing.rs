//! Pricing Config

use clap::Args;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::{
    config::ConfigError,
    money::{currency_from_code, price_from_major},
    pricing::PricingPolicy,
};

/// Pricing settings. Amounts are in major units of the store currency.
#[derive(Debug, Clone, Args)]
pub struct PricingConfig {
    /// ISO code of the store currency (INR, GBP, USD, EUR)
    #[arg(long, env = "STORE_CURRENCY", default_value = "INR")]
    pub currency: String,

    /// Tax rate as a fraction of the subtotal
    #[arg(long, env = "STORE_TAX_RATE", default_value = "0.18")]
    pub tax_rate: Decimal,

    /// Subtotals strictly above this ship free
    #[arg(long, env = "STORE_FREE_SHIPPING_THRESHOLD", default_value = "8000")]
    pub free_shipping_threshold: Decimal,

    /// Shipping charged at or below the threshold
    #[arg(long, env = "STORE_FLAT_SHIPPING_FEE", default_value = "500")]
    pub flat_shipping_fee: Decimal,
}

impl PricingConfig {
    /// Build the pricing policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the currency is unknown, the tax rate is
    /// outside 0 to 1, or an amount is negative.
    pub fn policy(&self) -> Result<PricingPolicy, ConfigError> {
        let currency = currency_from_code(&self.currency)?;

        let policy = PricingPolicy::new(
            Percentage::from(self.tax_rate),
            price_from_major(self.free_shipping_threshold, currency)?,
            price_from_major(self.flat_shipping_fee, currency)?,
        )?;

        Ok(policy)
    }
}
