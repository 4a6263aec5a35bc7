//! Clock backend driven by the embassy time driver
//!
//! Boards running an embassy executor enable the `embassy` feature and hand
//! this clock to the firmware components. The 64-bit embassy instant is
//! narrowed to the crate-wide wrapping 32-bit millisecond tick.

use embassy_time::Instant;

use crate::platform::traits::ClockInterface;

/// Millisecond clock backed by `embassy_time::Instant`
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

impl EmbassyClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockInterface for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
