//! Mock clock implementation for testing

use core::cell::Cell;

use crate::platform::traits::ClockInterface;

/// Manually advanced millisecond clock
///
/// Interior mutability lets tests advance time while components hold a shared
/// reference to the clock.
#[derive(Debug, Default)]
pub struct MockClock {
    now_ms: Cell<u32>,
}

impl MockClock {
    /// Create a clock starting at tick 0
    pub fn new() -> Self {
        Self {
            now_ms: Cell::new(0),
        }
    }

    /// Create a clock starting at an arbitrary tick (wraparound tests)
    pub fn starting_at(now_ms: u32) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    /// Advance the clock, wrapping at `u32::MAX`
    pub fn advance(&self, ms: u32) {
        self.now_ms.set(self.now_ms.get().wrapping_add(ms));
    }

    /// Jump to an absolute tick
    pub fn set(&self, now_ms: u32) {
        self.now_ms.set(now_ms);
    }
}

impl ClockInterface for MockClock {
    fn now_ms(&self) -> u32 {
        self.now_ms.get()
    }
}
