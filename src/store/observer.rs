//! Store Observers

use crate::store::{State, Transition};

/// Notified after every dispatched transition.
///
/// Observers run once the new state is current, so they always see a
/// complete state and can never interleave with a transition. Closures taking
/// `(&Transition, &State)` are observers too.
pub trait StoreObserver {
    /// Called with the transition that was applied and the state it produced.
    fn on_transition(&mut self, transition: &Transition, state: &State);
}

impl<F> StoreObserver for F
where
    F: FnMut(&Transition, &State),
{
    fn on_transition(&mut self, transition: &Transition, state: &State) {
        self(transition, state);
    }
}
