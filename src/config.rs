//! Store configuration
//!
//! Every setting can come from the command line or the environment, and a
//! `.env` file is read first if one exists.

use clap::{Args, Parser};
use thiserror::Error;

use crate::{
    config::{logging::LoggingConfig, pricing::PricingConfig, snapshots::SnapshotConfig},
    money::PriceError,
    pricing::{PolicyError, PricingPolicy},
    snapshots::SnapshotError,
};

pub mod logging;
pub mod pricing;
pub mod snapshots;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid price or currency
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Pricing rules are inconsistent
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Snapshot directory could not be used
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Command-line cart line was not `SKU` or `SKU:QTY`
    #[error("invalid cart line: {0}")]
    InvalidCartLine(String),
}

/// Store configuration
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Pricing rules.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Snapshot storage.
    #[command(flatten)]
    pub snapshots: SnapshotConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl StoreConfig {
    /// Build the pricing policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the pricing settings are invalid.
    pub fn policy(&self) -> Result<PricingPolicy, ConfigError> {
        self.pricing.policy()
    }
}

/// Standalone store configuration, for binaries with no arguments of their own.
#[derive(Debug, Parser)]
#[command(name = "boutique", about = "Boutique cart store", long_about = None)]
pub struct StoreCli {
    /// Store settings.
    #[command(flatten)]
    pub store: StoreConfig,
}

impl StoreCli {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_build_the_standard_policy() -> TestResult {
        let cli = StoreCli::try_parse_from(["boutique"])?;
        let policy = cli.store.policy()?;

        assert_eq!(policy.currency(), INR);
        assert_eq!(
            policy.free_shipping_threshold(),
            Money::from_minor(800_000, INR)
        );
        assert_eq!(policy.flat_shipping_fee(), Money::from_minor(50_000, INR));
        assert!(cli.store.snapshots.snapshot_dir.is_none());

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let cli = StoreCli::try_parse_from([
            "boutique",
            "--currency",
            "GBP",
            "--free-shipping-threshold",
            "50",
            "--flat-shipping-fee",
            "3.99",
        ])?;
        let policy = cli.store.policy()?;

        assert_eq!(policy.currency().iso_alpha_code, "GBP");
        assert_eq!(policy.flat_shipping_fee().to_minor_units(), 399);

        Ok(())
    }

    #[test]
    fn shipping_fee_below_the_minor_unit_is_rejected() -> TestResult {
        let cli = StoreCli::try_parse_from(["boutique", "--flat-shipping-fee", "3.999"])?;

        assert!(matches!(
            cli.store.policy(),
            Err(ConfigError::Price(PriceError::InvalidPrice(_)))
        ));

        Ok(())
    }

    #[test]
    fn non_numeric_tax_rate_is_rejected_by_the_parser() {
        let result = StoreCli::try_parse_from(["boutique", "--tax-rate", "eighteen"]);

        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_tax_rate_is_reported() -> TestResult {
        let cli = StoreCli::try_parse_from(["boutique", "--tax-rate", "1.5"])?;

        assert!(matches!(
            cli.store.policy(),
            Err(ConfigError::Policy(PolicyError::TaxRateOutOfRange(_)))
        ));

        Ok(())
    }
}
