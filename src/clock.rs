//! Clock

use jiff::Timestamp;

/// Source of the current time for transitions.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock frozen at one instant, for reproducible states.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self(Timestamp::UNIX_EPOCH)
    }
}
