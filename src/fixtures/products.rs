//! Product Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    money::parse_price,
    products::{
        ColorId, ColorOption, Product, ProductId, ProductImage, SizeId, SizeOption, Variant,
        VariantId,
    },
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Display name
    pub name: String,

    /// URL slug, defaults to the fixture key
    #[serde(default)]
    pub slug: Option<String>,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Base price (e.g. "7500.00 INR")
    pub price: String,

    /// Optional "was" price
    #[serde(default)]
    pub compare_at_price: Option<String>,

    /// Images
    #[serde(default)]
    pub images: Vec<ProductImage>,

    /// Available colors
    #[serde(default)]
    pub colors: Vec<ColorOption>,

    /// Available sizes
    #[serde(default)]
    pub sizes: Vec<SizeOption>,

    /// Purchasable variants
    #[serde(default)]
    pub variants: Vec<VariantFixture>,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Featured flag
    #[serde(default)]
    pub featured: bool,

    /// Active flag
    #[serde(default = "active")]
    pub active: bool,

    /// Average review rating
    #[serde(default)]
    pub rating: Option<Decimal>,
}

/// Variant fixture from YAML
#[derive(Debug, Deserialize)]
pub struct VariantFixture {
    /// Stock keeping unit
    pub sku: String,

    /// Color id, one of the product's colors
    pub color: String,

    /// Size id, one of the product's sizes
    pub size: String,

    /// Price, defaults to the product price
    #[serde(default)]
    pub price: Option<String>,

    /// Optional "was" price, defaults to the product's
    #[serde(default)]
    pub compare_at_price: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Active flag
    #[serde(default = "active")]
    pub active: bool,
}

fn active() -> bool {
    true
}

impl ProductFixture {
    /// Convert to a [`Product`] whose id is the fixture key.
    ///
    /// Variant ids are `<key>-<color>-<size>`; the product's stock is the sum
    /// of its variants' stock.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or a variant refers to a
    /// color or size the product does not list.
    pub fn try_into_product(self, key: &str) -> Result<Product, FixtureError> {
        let id = ProductId::new(key);
        let price = parse_price(&self.price)?;
        let compare_at_price = self.compare_at_price.as_deref().map(parse_price).transpose()?;

        let variants = self
            .variants
            .into_iter()
            .map(|variant| {
                if !self.colors.iter().any(|color| color.id.as_str() == variant.color) {
                    return Err(FixtureError::UnknownColor {
                        product: key.to_string(),
                        color: variant.color,
                    });
                }

                if !self.sizes.iter().any(|size| size.id.as_str() == variant.size) {
                    return Err(FixtureError::UnknownSize {
                        product: key.to_string(),
                        size: variant.size,
                    });
                }

                let variant_price = match variant.price.as_deref() {
                    Some(raw) => parse_price(raw)?,
                    None => price,
                };

                let variant_compare_at = match variant.compare_at_price.as_deref() {
                    Some(raw) => Some(parse_price(raw)?),
                    None => compare_at_price,
                };

                Ok(Variant {
                    id: VariantId::new(format!("{key}-{}-{}", variant.color, variant.size)),
                    product_id: id.clone(),
                    color_id: ColorId::new(variant.color),
                    size_id: SizeId::new(variant.size),
                    sku: variant.sku,
                    price: variant_price,
                    compare_at_price: variant_compare_at,
                    stock: variant.stock,
                    active: variant.active,
                })
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let stock = variants
            .iter()
            .fold(0_u32, |total, variant| total.saturating_add(variant.stock));

        Ok(Product {
            slug: self.slug.unwrap_or_else(|| key.to_string()),
            id,
            name: self.name,
            description: self.description,
            price,
            compare_at_price,
            images: self.images,
            variants,
            colors: self.colors,
            sizes: self.sizes,
            tags: self.tags,
            featured: self.featured,
            active: self.active,
            stock,
            rating: self.rating,
        })
    }
}
