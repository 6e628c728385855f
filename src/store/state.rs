//! Store State

use jiff::Timestamp;
use rusty_money::iso::Currency;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartItem, CartItemId},
    money::format_price,
    pricing::PricingPolicy,
    products::{Product, ProductId, Variant},
    store::transition::Transition,
    users::UserProfile,
    wishlist::{Wishlist, WishlistEntry, WishlistEntryId},
};

/// Everything the shopper currently intends to buy or has favorited.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    cart: Cart,
    wishlist: Wishlist,
    user: Option<UserProfile>,
}

impl State {
    /// Empty cart and wishlist for the given (possibly anonymous) user.
    pub fn new(user: Option<UserProfile>, currency: &'static Currency, now: Timestamp) -> Self {
        Self {
            cart: Cart::new(currency, now),
            wishlist: Wishlist::new(),
            user,
        }
    }

    /// Current cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current wishlist
    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Signed-in user, if any
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Apply a transition, producing the next state.
    ///
    /// `self` is never modified. A transition that changes nothing returns a
    /// value equal to `self`, timestamps included.
    #[must_use]
    pub fn apply(&self, transition: &Transition, policy: &PricingPolicy, now: Timestamp) -> Self {
        match transition {
            Transition::AddToCart {
                item_id,
                product,
                variant,
                quantity,
            } => self.add_to_cart(item_id, product, variant, *quantity, policy, now),
            Transition::RemoveFromCart { item_id } => self.remove_from_cart(item_id, policy, now),
            Transition::UpdateCartQuantity { item_id, quantity } => {
                if *quantity <= 0 {
                    self.remove_from_cart(item_id, policy, now)
                } else {
                    let quantity = u32::try_from(*quantity).unwrap_or(u32::MAX);

                    self.set_quantity(item_id, quantity, policy, now)
                }
            }
            Transition::ClearCart => self.clear_cart(policy, now),
            Transition::AddToWishlist { entry_id, product } => {
                self.add_to_wishlist(entry_id, product, now)
            }
            Transition::RemoveFromWishlist { product_id } => self.remove_from_wishlist(product_id),
        }
    }

    fn with_cart(&self, cart: Cart) -> Self {
        Self {
            cart,
            ..self.clone()
        }
    }

    fn with_wishlist(&self, wishlist: Wishlist) -> Self {
        Self {
            wishlist,
            ..self.clone()
        }
    }

    fn add_to_cart(
        &self,
        item_id: &CartItemId,
        product: &Product,
        variant: &Variant,
        quantity: u32,
        policy: &PricingPolicy,
        now: Timestamp,
    ) -> Self {
        if quantity == 0 {
            debug!(sku = %variant.sku, "ignoring add of zero units");

            return self.clone();
        }

        if variant.price.currency() != policy.currency() {
            warn!(
                sku = %variant.sku,
                price = %format_price(&variant.price),
                currency = policy.currency().iso_alpha_code,
                "ignoring variant priced in a foreign currency"
            );

            return self.clone();
        }

        let items = if self.cart.item_for_variant(&variant.id).is_some() {
            self.cart
                .iter()
                .map(|item| {
                    if item.variant_id() == &variant.id {
                        item.with_quantity(item.quantity().saturating_add(quantity))
                    } else {
                        item.clone()
                    }
                })
                .collect()
        } else {
            let mut items = self.cart.items().to_vec();
            items.push(CartItem::new(
                item_id.clone(),
                product.clone(),
                variant.clone(),
                quantity,
                now,
            ));
            items
        };

        self.with_cart(self.cart.with_items(items, policy, now))
    }

    fn remove_from_cart(
        &self,
        item_id: &CartItemId,
        policy: &PricingPolicy,
        now: Timestamp,
    ) -> Self {
        if self.cart.item(item_id).is_none() {
            return self.clone();
        }

        let items = self
            .cart
            .iter()
            .filter(|item| item.id() != item_id)
            .cloned()
            .collect();

        self.with_cart(self.cart.with_items(items, policy, now))
    }

    fn set_quantity(
        &self,
        item_id: &CartItemId,
        quantity: u32,
        policy: &PricingPolicy,
        now: Timestamp,
    ) -> Self {
        if self.cart.item(item_id).is_none() {
            return self.clone();
        }

        let items = self
            .cart
            .iter()
            .map(|item| {
                if item.id() == item_id {
                    item.with_quantity(quantity)
                } else {
                    item.clone()
                }
            })
            .collect();

        self.with_cart(self.cart.with_items(items, policy, now))
    }

    fn clear_cart(&self, policy: &PricingPolicy, now: Timestamp) -> Self {
        if self.cart.is_empty() {
            return self.clone();
        }

        self.with_cart(self.cart.with_items(Vec::new(), policy, now))
    }

    fn add_to_wishlist(
        &self,
        entry_id: &WishlistEntryId,
        product: &Product,
        now: Timestamp,
    ) -> Self {
        let user_id = self.user.as_ref().map(|user| user.id.clone());
        let entry = WishlistEntry::new(entry_id.clone(), product.clone(), user_id, now);

        match self.wishlist.with_entry(entry) {
            Some(wishlist) => self.with_wishlist(wishlist),
            None => self.clone(),
        }
    }

    fn remove_from_wishlist(&self, product_id: &ProductId) -> Self {
        match self.wishlist.without(product_id) {
            Some(wishlist) => self.with_wishlist(wishlist),
            None => self.clone(),
        }
    }
}
