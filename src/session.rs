//! Session
//!
//! The operations the rest of the storefront uses to change or query the
//! shopper's cart and wishlist. Each mutating call builds exactly one
//! [`Transition`] and dispatches it to the session's [`CartStore`].

use std::sync::Arc;

use tracing::info;

use crate::{
    cart::{Cart, CartItemId},
    clock::{Clock, SystemClock},
    money::format_price,
    pricing::PricingPolicy,
    products::{Product, ProductId, Variant},
    snapshots::{SnapshotStore, SnapshotWriter, restore},
    store::{CartStore, State, StoreObserver, Transition},
};

/// One shopper's cart and wishlist.
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    store: CartStore<C>,
    saved_cart: Option<Cart>,
}

impl Session<SystemClock> {
    /// Anonymous session on the system clock with nothing persisted.
    pub fn new(policy: PricingPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    /// Anonymous session with nothing persisted.
    pub fn with_clock(policy: PricingPolicy, clock: C) -> Self {
        Self {
            store: CartStore::new(policy, clock),
            saved_cart: None,
        }
    }

    /// Start a session backed by a snapshot store.
    ///
    /// A saved user becomes the session's user. A saved cart is kept aside
    /// (see [`Session::saved_cart`]) but the session starts with an empty
    /// cart, which is written back to `snapshots` after every change.
    pub fn open<S>(policy: PricingPolicy, clock: C, mut snapshots: S) -> Self
    where
        S: SnapshotStore + 'static,
    {
        let restored = restore(&mut snapshots, &policy);

        if let Some(cart) = &restored.cart {
            info!(
                lines = cart.len(),
                units = cart.quantity(),
                total = %format_price(&cart.total()),
                "found saved cart"
            );
        }

        let state = State::new(restored.user, policy.currency(), clock.now());
        let mut store = CartStore::with_state(state, policy, clock);

        store.subscribe(SnapshotWriter::new(snapshots));

        Self {
            store,
            saved_cart: restored.cart,
        }
    }

    /// Add `quantity` units of a variant to the cart.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        variant: &Variant,
        quantity: u32,
    ) -> Arc<State> {
        self.store
            .dispatch(Transition::add_to_cart(product, variant, quantity))
    }

    /// Remove a line item.
    pub fn remove_from_cart(&mut self, item_id: &CartItemId) -> Arc<State> {
        self.store.dispatch(Transition::RemoveFromCart {
            item_id: item_id.clone(),
        })
    }

    /// Set a line item's quantity; zero or below removes it.
    pub fn update_cart_quantity(&mut self, item_id: &CartItemId, quantity: i64) -> Arc<State> {
        self.store.dispatch(Transition::UpdateCartQuantity {
            item_id: item_id.clone(),
            quantity,
        })
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> Arc<State> {
        self.store.dispatch(Transition::ClearCart)
    }

    /// Favorite a product.
    pub fn add_to_wishlist(&mut self, product: &Product) -> Arc<State> {
        self.store.dispatch(Transition::add_to_wishlist(product))
    }

    /// Unfavorite a product.
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) -> Arc<State> {
        self.store.dispatch(Transition::RemoveFromWishlist {
            product_id: product_id.clone(),
        })
    }

    /// Check whether a product is favorited.
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.store.state().wishlist().contains(product_id)
    }

    /// Total units in the cart, summed across line items.
    pub fn cart_items_count(&self) -> u64 {
        self.store.state().cart().quantity()
    }

    /// Number of favorited products.
    pub fn wishlist_count(&self) -> usize {
        self.store.state().wishlist().len()
    }

    /// Current state.
    pub fn state(&self) -> Arc<State> {
        self.store.state()
    }

    /// Cart left by an earlier session, if one was found at startup.
    pub fn saved_cart(&self) -> Option<&Cart> {
        self.saved_cart.as_ref()
    }

    /// The underlying store.
    pub fn store(&self) -> &CartStore<C> {
        &self.store
    }

    /// Drain the store's transition history. See [`CartStore::take_history`].
    pub fn take_history(&mut self) -> Vec<Transition> {
        self.store.take_history()
    }

    /// Register an observer for subsequent changes.
    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) {
        self.store.subscribe(observer);
    }

    pub(crate) fn dispatch(&mut self, transition: Transition) -> Arc<State> {
        self.store.dispatch(transition)
    }
}
