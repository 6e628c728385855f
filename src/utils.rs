//! Utils

use clap::Parser;

use crate::config::{ConfigError, StoreConfig};

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Fill a cart from a catalog fixture", long_about = None)]
pub struct ExampleCartArgs {
    /// Fixture set to load products from
    #[clap(short, long, default_value = "apparel")]
    pub fixture: String,

    /// Add a variant to the cart, as `SKU` or `SKU:QTY` (repeatable)
    #[clap(short, long = "add")]
    pub add: Vec<String>,

    /// Favorite a product by its fixture key (repeatable)
    #[clap(short, long = "wishlist")]
    pub wishlist: Vec<String>,

    /// Place a simulated order once the cart is filled
    #[clap(long)]
    pub checkout: bool,

    /// Store settings.
    #[command(flatten)]
    pub store: StoreConfig,
}

impl ExampleCartArgs {
    /// Load arguments from environment and command line
    ///
    /// # Errors
    ///
    /// Returns an error if arguments cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// The requested cart lines as `(sku, quantity)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCartLine`] for malformed entries.
    pub fn cart_lines(&self) -> Result<Vec<(String, u32)>, ConfigError> {
        self.add.iter().map(|line| parse_cart_line(line)).collect()
    }
}

/// Parse `SKU` or `SKU:QTY`. A bare SKU means one unit.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidCartLine`] if the SKU is empty or the
/// quantity is not a non-negative integer.
pub fn parse_cart_line(line: &str) -> Result<(String, u32), ConfigError> {
    let (sku, quantity) = match line.split_once(':') {
        Some((sku, quantity)) => (
            sku,
            quantity
                .trim()
                .parse::<u32>()
                .map_err(|_err| ConfigError::InvalidCartLine(line.to_string()))?,
        ),
        None => (line, 1),
    };

    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ConfigError::InvalidCartLine(line.to_string()));
    }

    Ok((sku.to_string(), quantity))
}
