//! Wishlist

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    products::{Product, ProductId},
    users::UserId,
};

/// Wishlist Entry Id
pub type WishlistEntryId = TypedId<WishlistEntry>;

/// A favorited product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    id: WishlistEntryId,
    user_id: Option<UserId>,
    product_id: ProductId,
    product: Product,
    created_at: Timestamp,
}

impl WishlistEntry {
    /// Create an entry.
    pub fn new(
        id: WishlistEntryId,
        product: Product,
        user_id: Option<UserId>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            product_id: product.id.clone(),
            product,
            created_at,
        }
    }

    /// Entry id
    pub fn id(&self) -> &WishlistEntryId {
        &self.id
    }

    /// Owning user, `None` for anonymous shoppers
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Favorited product id
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product snapshot taken when favorited
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// When the product was favorited
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Favorited products, at most one entry per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// Create an empty wishlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a product has been favorited.
    pub fn contains(&self, product: &ProductId) -> bool {
        self.entry(product).is_some()
    }

    /// Find the entry for a product.
    pub fn entry(&self, product: &ProductId) -> Option<&WishlistEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.product_id == product)
    }

    /// Iterate over entries in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &WishlistEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the wishlist is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry unless its product is already present.
    ///
    /// Returns `None` when the product was already favorited.
    pub(crate) fn with_entry(&self, entry: WishlistEntry) -> Option<Self> {
        if self.contains(&entry.product_id) {
            return None;
        }

        let mut entries = self.entries.clone();
        entries.push(entry);

        Some(Self { entries })
    }

    /// Drop the entry for a product.
    ///
    /// Returns `None` when there was nothing to remove.
    pub(crate) fn without(&self, product: &ProductId) -> Option<Self> {
        if !self.contains(product) {
            return None;
        }

        Some(Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| &entry.product_id != product)
                .cloned()
                .collect(),
        })
    }
}
