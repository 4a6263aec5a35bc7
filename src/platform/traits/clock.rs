//! Monotonic clock interface
//!
//! The firmware has no real-time clock. All scheduling is done against a
//! millisecond tick counter that wraps at `u32::MAX` (about 49.7 days).
//! Every elapsed-time comparison in the crate uses `wrapping_sub`, so the
//! wrap is transparent as long as the measured interval is shorter than the
//! counter period.

/// Monotonic millisecond clock
pub trait ClockInterface {
    /// Milliseconds since boot, wrapping at `u32::MAX`
    fn now_ms(&self) -> u32;
}

/// Wraparound-safe elapsed time between two ticks
///
/// `now` and `then` come from the same [`ClockInterface`]; the result is
/// interpreted modulo the counter width.
pub fn elapsed_ms(now: u32, then: u32) -> u32 {
    now.wrapping_sub(then)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_simple() {
        assert_eq!(elapsed_ms(5000, 2000), 3000);
        assert_eq!(elapsed_ms(2000, 2000), 0);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        // 100 ms before the wrap, observed 400 ms later
        let then = u32::MAX - 99;
        let now = 300u32;
        assert_eq!(elapsed_ms(now, then), 400);
    }
}
