//! Products
//!
//! Catalog data as the cart sees it. These values are owned by the catalog
//! collaborator; the cart and wishlist only ever hold copies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    money::{Price, serde_price, serde_price_opt},
};

/// Product Id
pub type ProductId = TypedId<Product>;

/// Variant Id
pub type VariantId = TypedId<Variant>;

/// Color Id
pub type ColorId = TypedId<ColorOption>;

/// Size Id
pub type SizeId = TypedId<SizeOption>;

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// URL slug
    pub slug: String,

    /// Long-form description
    pub description: String,

    /// Base price
    #[serde(with = "serde_price")]
    pub price: Price,

    /// Price shown struck through next to the base price
    #[serde(default, with = "serde_price_opt")]
    pub compare_at_price: Option<Price>,

    /// Product images, in display order
    #[serde(default)]
    pub images: Vec<ProductImage>,

    /// Purchasable variants
    #[serde(default)]
    pub variants: Vec<Variant>,

    /// Colors offered across all variants
    #[serde(default)]
    pub colors: Vec<ColorOption>,

    /// Sizes offered across all variants
    #[serde(default)]
    pub sizes: Vec<SizeOption>,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Shown in featured listings
    #[serde(default)]
    pub featured: bool,

    /// Listed in the storefront
    pub active: bool,

    /// Aggregate stock across variants
    pub stock: u32,

    /// Average review rating
    #[serde(default)]
    pub rating: Option<Decimal>,
}

impl Product {
    /// Find one of this product's variants by id.
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|variant| &variant.id == id)
    }

    /// Find a variant by color and size.
    pub fn variant_for(&self, color: &ColorId, size: &SizeId) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|variant| &variant.color_id == color && &variant.size_id == size)
    }
}

/// A purchasable color/size combination of a [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant id; the unit of deduplication inside a cart
    pub id: VariantId,

    /// Owning product
    pub product_id: ProductId,

    /// Color of this variant
    pub color_id: ColorId,

    /// Size of this variant
    pub size_id: SizeId,

    /// Stock keeping unit
    pub sku: String,

    /// Unit price
    #[serde(with = "serde_price")]
    pub price: Price,

    /// Struck-through comparison price
    #[serde(default, with = "serde_price_opt")]
    pub compare_at_price: Option<Price>,

    /// Units in stock
    pub stock: u32,

    /// Available for purchase
    pub active: bool,
}

/// Product image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image URL
    pub url: String,

    /// Alternative text
    #[serde(default)]
    pub alt: Option<String>,
}

/// Color option, denormalized onto products for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    /// Color id
    pub id: ColorId,

    /// Display name
    pub name: String,

    /// Swatch color, e.g. `#1f2a44`
    pub hex: String,
}

/// Size option, denormalized onto products for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    /// Size id
    pub id: SizeId,

    /// Display name, e.g. `M`
    pub name: String,
}

#[cfg(test)]
pub(crate) mod test_support {
    use rusty_money::{Money, iso::INR};

    use super::*;

    /// A single-variant product priced in whole rupees.
    pub(crate) fn product_with_variant(key: &str, rupees: i64) -> (Product, Variant) {
        let variant = Variant {
            id: VariantId::new(format!("{key}-navy-m")),
            product_id: ProductId::new(key),
            color_id: ColorId::new("navy"),
            size_id: SizeId::new("m"),
            sku: format!("{}-NV-M", key.to_uppercase()),
            price: Money::from_minor(rupees * 100, INR),
            compare_at_price: None,
            stock: 10,
            active: true,
        };

        let product = Product {
            id: ProductId::new(key),
            name: key.to_string(),
            slug: key.to_string(),
            description: String::new(),
            price: variant.price,
            compare_at_price: None,
            images: Vec::new(),
            variants: vec![variant.clone()],
            colors: Vec::new(),
            sizes: Vec::new(),
            tags: Vec::new(),
            featured: false,
            active: true,
            stock: variant.stock,
            rating: None,
        };

        (product, variant)
    }
}
