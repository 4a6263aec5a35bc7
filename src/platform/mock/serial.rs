//! Mock serial implementation for testing

use heapless::{Deque, Vec};

use crate::platform::traits::SerialInterface;
use crate::platform::Result;

/// RAM-backed half-duplex serial port
///
/// Tests feed receive data with [`MockSerial::feed`] and inspect transmitted
/// bytes in `tx`. Transmission bracketing is counted so protocol tests can
/// verify the driver-enable discipline.
#[derive(Debug, Default)]
pub struct MockSerial {
    rx: Deque<u8, 512>,
    pub tx: Vec<u8, 512>,
    pub transmitting: bool,
    pub transmissions: u32,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes on the receive side
    pub fn feed(&mut self, data: &[u8]) {
        for &byte in data {
            let _ = self.rx.push_back(byte);
        }
    }

    /// Transmitted bytes as a str (lossy checks are fine in tests)
    pub fn transmitted(&self) -> &[u8] {
        &self.tx
    }
}

impl SerialInterface for MockSerial {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let _ = self.tx.extend_from_slice(data);
        Ok(())
    }

    fn begin_transmission(&mut self) {
        self.transmitting = true;
        self.transmissions += 1;
    }

    fn end_transmission(&mut self) {
        self.transmitting = false;
    }
}
