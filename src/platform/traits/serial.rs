//! Half-duplex serial interface
//!
//! RS-485 style bus access. The driver-enable discipline (DE pin, pre/post
//! delays, flush before releasing the bus) is the platform's responsibility;
//! the protocol layer only brackets its writes with
//! [`SerialInterface::begin_transmission`] / [`SerialInterface::end_transmission`].

use crate::platform::Result;

/// Half-duplex serial bus
pub trait SerialInterface {
    /// Next received byte, if any. Non-blocking.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue bytes for transmission
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Claim the bus for transmission (assert driver-enable)
    fn begin_transmission(&mut self);

    /// Release the bus (flush, deassert driver-enable)
    fn end_transmission(&mut self);
}
