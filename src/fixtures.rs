//! Fixtures
//!
//! YAML catalogs for demos and tests, loaded from
//! `<base>/products/<name>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    money::PriceError,
    products::{Product, Variant, VariantId},
};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price or currency
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// A variant refers to a color the product does not list
    #[error("Product {product} has no color {color}")]
    UnknownColor {
        /// Product key
        product: String,

        /// Color id used by the variant
        color: String,
    },

    /// A variant refers to a size the product does not list
    #[error("Product {product} has no size {size}")]
    UnknownSize {
        /// Product key
        product: String,

        /// Size id used by the variant
        size: String,
    },

    /// Two variants share a SKU
    #[error("Duplicate SKU: {0}")]
    DuplicateSku(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Fixture key -> product
    products: FxHashMap<String, Product>,

    /// SKU -> (fixture key, variant id)
    skus: FxHashMap<String, (String, VariantId)>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            skus: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load a fixture set from the default path
    ///
    /// # Errors
    ///
    /// Returns an error if the products file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?;

        Ok(fixture)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product is
    /// inconsistent, or if prices use more than one currency.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.load_products_str(&contents)
    }

    /// Load products from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed, if a product is
    /// inconsistent, or if prices use more than one currency.
    pub fn load_products_str(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: products::ProductsFixture = serde_norway::from_str(yaml)?;

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.try_into_product(&key)?;

            for variant in &product.variants {
                self.check_currency(variant.price.currency())?;

                if self.skus.contains_key(&variant.sku) {
                    return Err(FixtureError::DuplicateSku(variant.sku.clone()));
                }

                self.skus
                    .insert(variant.sku.clone(), (key.clone(), variant.id.clone()));
            }

            self.check_currency(product.price.currency())?;
            self.products.insert(key, product);
        }

        Ok(self)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }

    /// Get a product by its fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::ProductNotFound`] for unknown keys.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a variant and its product by SKU
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::VariantNotFound`] for unknown SKUs.
    pub fn variant_by_sku(&self, sku: &str) -> Result<(&Product, &Variant), FixtureError> {
        let (key, variant_id) = self
            .skus
            .get(sku)
            .ok_or_else(|| FixtureError::VariantNotFound(sku.to_string()))?;

        let product = self.product(key)?;

        let variant = product
            .variant(variant_id)
            .ok_or_else(|| FixtureError::VariantNotFound(sku.to_string()))?;

        Ok((product, variant))
    }

    /// All loaded products, ordered by fixture key
    pub fn products(&self) -> Vec<&Product> {
        let mut keys: Vec<&String> = self.products.keys().collect();
        keys.sort();

        keys.into_iter()
            .filter_map(|key| self.products.get(key))
            .collect()
    }

    /// Get the currency used by the fixture set
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if nothing has been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn loads_the_apparel_set() -> TestResult {
        let fixture = Fixture::from_set("apparel")?;

        assert_eq!(fixture.currency()?, INR);
        assert_eq!(fixture.products().len(), 3);

        let kurta = fixture.product("linen-kurta")?;

        assert_eq!(kurta.price, Money::from_minor(750_000, INR));
        assert_eq!(kurta.variants.len(), 3);
        assert_eq!(kurta.stock, 16);

        Ok(())
    }

    #[test]
    fn finds_variants_by_sku() -> TestResult {
        let fixture = Fixture::from_set("apparel")?;

        let (product, variant) = fixture.variant_by_sku("STOLE-MRN-OS")?;

        assert_eq!(product.name, "Silk Stole");
        assert_eq!(variant.price, Money::from_minor(269_950, INR));
        assert!(matches!(
            fixture.variant_by_sku("NOPE"),
            Err(FixtureError::VariantNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn missing_set_is_an_io_error() {
        assert!(matches!(
            Fixture::from_set("does-not-exist"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn rejects_mixed_currencies() {
        let yaml = r"
products:
  a:
    name: A
    price: 10 INR
    colors: [{ id: red, name: Red, hex: '#f00' }]
    sizes: [{ id: m, name: M }]
    variants: [{ sku: A-1, color: red, size: m, stock: 1 }]
  b:
    name: B
    price: 10 GBP
    colors: [{ id: red, name: Red, hex: '#f00' }]
    sizes: [{ id: m, name: M }]
    variants: [{ sku: B-1, color: red, size: m, stock: 1 }]
";

        let result = Fixture::new().load_products_str(yaml).map(|_| ());

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn rejects_duplicate_skus() {
        let yaml = r"
products:
  a:
    name: A
    price: 10 INR
    colors: [{ id: red, name: Red, hex: '#f00' }]
    sizes: [{ id: m, name: M }, { id: l, name: L }]
    variants:
      - { sku: A-1, color: red, size: m, stock: 1 }
      - { sku: A-1, color: red, size: l, stock: 1 }
";

        let result = Fixture::new().load_products_str(yaml).map(|_| ());

        assert!(matches!(result, Err(FixtureError::DuplicateSku(sku)) if sku == "A-1"));
    }
}
