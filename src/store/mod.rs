//! Cart/wishlist state store
//!
//! [`CartStore`] owns the current [`State`] and is the only place it changes.
//! Callers hand it a [`Transition`]; the store computes the next state with
//! [`State::apply`], swaps it in whole, records the transition, and notifies
//! observers. Readers hold an `Arc<State>` that never changes underneath them.

use std::{fmt, mem, sync::Arc};

use jiff::Timestamp;
use tracing::debug;

use crate::{
    clock::{Clock, SystemClock},
    money::format_price,
    pricing::PricingPolicy,
};

pub mod observer;
pub mod state;
pub mod transition;

pub use observer::StoreObserver;
pub use state::State;
pub use transition::Transition;

/// Owner of the shopper's cart and wishlist.
pub struct CartStore<C: Clock = SystemClock> {
    state: Arc<State>,
    policy: PricingPolicy,
    clock: C,
    history: Vec<Transition>,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl<C: Clock> CartStore<C> {
    /// Create a store with an empty, anonymous state.
    pub fn new(policy: PricingPolicy, clock: C) -> Self {
        let state = State::new(None, policy.currency(), clock.now());

        Self::with_state(state, policy, clock)
    }

    /// Create a store starting from an existing state.
    pub fn with_state(state: State, policy: PricingPolicy, clock: C) -> Self {
        Self {
            state: Arc::new(state),
            policy,
            clock,
            history: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// The current state.
    pub fn state(&self) -> Arc<State> {
        Arc::clone(&self.state)
    }

    /// Pricing rules used for totals.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Every transition dispatched since the store was created or the history
    /// was last taken, oldest first.
    ///
    /// The history lives as long as the store. Each `AddToCart` and
    /// `AddToWishlist` in it owns a full copy of its product, variants and
    /// images included, so a long session should drain it with
    /// [`CartStore::take_history`].
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Hand over the recorded transitions and start a fresh history.
    ///
    /// Replaying the returned transitions over the state as it was at the
    /// previous take gives the current state.
    pub fn take_history(&mut self) -> Vec<Transition> {
        mem::take(&mut self.history)
    }

    /// Register an observer for subsequent transitions.
    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply a transition and make the result the current state.
    pub fn dispatch(&mut self, transition: Transition) -> Arc<State> {
        let next = self
            .state
            .apply(&transition, &self.policy, self.clock.now());

        debug!(
            transition = transition.name(),
            lines = next.cart().len(),
            units = next.cart().quantity(),
            total = %format_price(&next.cart().total()),
            wishlist = next.wishlist().len(),
            "applied transition"
        );

        self.state = Arc::new(next);

        for observer in &mut self.observers {
            observer.on_transition(&transition, &self.state);
        }

        self.history.push(transition);

        self.state()
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for CartStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("clock", &self.clock)
            .field("history", &self.history.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
