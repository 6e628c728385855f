//! Transitions

use crate::{
    cart::CartItemId,
    products::{Product, ProductId, Variant},
    wishlist::WishlistEntryId,
};

/// A named change to the shopper's state.
///
/// Every transition is defined for every input. Requests that make no sense
/// for the current state (unknown ids, zero quantities) leave it unchanged.
///
/// Ids for new lines and entries are minted when the transition is built, so
/// applying the same transition to the same state always gives the same result.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Add `quantity` units of a variant, merging into an existing line for the same variant.
    AddToCart {
        /// Id given to the line if a new one is appended
        item_id: CartItemId,

        /// Product snapshot to embed
        product: Box<Product>,

        /// Variant snapshot to embed
        variant: Box<Variant>,

        /// Units to add; zero is a no-op
        quantity: u32,
    },

    /// Remove a line item.
    RemoveFromCart {
        /// Line to remove
        item_id: CartItemId,
    },

    /// Replace a line's quantity. Zero or below removes the line.
    UpdateCartQuantity {
        /// Line to change
        item_id: CartItemId,

        /// New quantity
        quantity: i64,
    },

    /// Remove every line item.
    ClearCart,

    /// Favorite a product.
    AddToWishlist {
        /// Id given to the entry if the product is not yet favorited
        entry_id: WishlistEntryId,

        /// Product snapshot to embed
        product: Box<Product>,
    },

    /// Unfavorite a product.
    RemoveFromWishlist {
        /// Product to unfavorite
        product_id: ProductId,
    },
}

impl Transition {
    /// Add units of a variant, with a freshly generated line id.
    pub fn add_to_cart(product: &Product, variant: &Variant, quantity: u32) -> Self {
        Transition::AddToCart {
            item_id: CartItemId::generate(),
            product: Box::new(product.clone()),
            variant: Box::new(variant.clone()),
            quantity,
        }
    }

    /// Favorite a product, with a freshly generated entry id.
    pub fn add_to_wishlist(product: &Product) -> Self {
        Transition::AddToWishlist {
            entry_id: WishlistEntryId::generate(),
            product: Box::new(product.clone()),
        }
    }

    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Transition::AddToCart { .. } => "add_to_cart",
            Transition::RemoveFromCart { .. } => "remove_from_cart",
            Transition::UpdateCartQuantity { .. } => "update_cart_quantity",
            Transition::ClearCart => "clear_cart",
            Transition::AddToWishlist { .. } => "add_to_wishlist",
            Transition::RemoveFromWishlist { .. } => "remove_from_wishlist",
        }
    }
}
