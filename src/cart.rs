//! Cart

use jiff::Timestamp;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    money::Price,
    pricing::{PricingPolicy, Totals},
    products::{Product, ProductId, Variant, VariantId},
};

/// Cart Id
pub type CartId = TypedId<Cart>;

/// Cart Item Id
pub type CartItemId = TypedId<CartItem>;

/// "N units of variant V", with the product and variant as they were when added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    id: CartItemId,
    product_id: ProductId,
    variant_id: VariantId,
    product: Product,
    variant: Variant,
    quantity: u32,
    added_at: Timestamp,
}

impl CartItem {
    /// Create a line item.
    pub fn new(
        id: CartItemId,
        product: Product,
        variant: Variant,
        quantity: u32,
        added_at: Timestamp,
    ) -> Self {
        Self {
            id,
            product_id: product.id.clone(),
            variant_id: variant.id.clone(),
            product,
            variant,
            quantity,
            added_at,
        }
    }

    /// Line item id
    pub fn id(&self) -> &CartItemId {
        &self.id
    }

    /// Id of the product this line belongs to
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Id of the purchased variant
    pub fn variant_id(&self) -> &VariantId {
        &self.variant_id
    }

    /// Product snapshot taken when the line was created
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Variant snapshot taken when the line was created
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Units of the variant in the cart
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// When the line was created
    pub fn added_at(&self) -> Timestamp {
        self.added_at
    }

    /// Unit price at the time the line was created
    pub fn unit_price(&self) -> Price {
        self.variant.price
    }

    pub(crate) fn line_total_minor(&self) -> i64 {
        self.variant
            .price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }

    pub(crate) fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Cart
///
/// A cart value is never edited in place. Every change produces a new cart
/// through [`Cart::with_items`], which recomputes the totals from the items,
/// so the totals cannot drift from the line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    items: Vec<CartItem>,
    totals: Totals,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency, now: Timestamp) -> Self {
        Self {
            id: CartId::generate(),
            items: Vec::new(),
            totals: Totals::zero(currency),
            created_at: now,
            updated_at: now,
        }
    }

    /// A new cart with the given items, the same id and creation time, and
    /// freshly computed totals.
    pub(crate) fn with_items(
        &self,
        items: Vec<CartItem>,
        policy: &PricingPolicy,
        now: Timestamp,
    ) -> Self {
        Self {
            id: self.id.clone(),
            totals: Totals::compute(&items, policy),
            items,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Check that the stored totals are exactly what `policy` gives for the
    /// line items, in the policy currency, with every line holding at least
    /// one unit. Always true for carts built by the store; a cart decoded
    /// from a snapshot may fail it.
    pub fn is_priced_by(&self, policy: &PricingPolicy) -> bool {
        let currency = policy.currency();

        self.currency() == currency
            && self
                .items
                .iter()
                .all(|item| item.quantity > 0 && item.unit_price().currency() == currency)
            && Totals::compute(&self.items, policy) == self.totals
    }

    /// Cart id
    pub fn id(&self) -> &CartId {
        &self.id
    }

    /// Line items in insertion order
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over the line items.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Look up a line item by its id.
    pub fn item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Look up the line item holding a variant.
    pub fn item_for_variant(&self, variant: &VariantId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.variant_id == variant)
    }

    /// Number of distinct line items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all line items
    pub fn quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// All four derived totals
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Sum of unit price times quantity
    pub fn subtotal(&self) -> Price {
        self.totals.subtotal
    }

    /// Tax on the subtotal
    pub fn tax(&self) -> Price {
        self.totals.tax
    }

    /// Shipping charge
    pub fn shipping(&self) -> Price {
        self.totals.shipping
    }

    /// Grand total
    pub fn total(&self) -> Price {
        self.totals.total
    }

    /// Currency of the totals
    pub fn currency(&self) -> &'static Currency {
        self.totals.total.currency()
    }

    /// When the cart was created
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the line items last changed
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}
