//! Mock retained-memory implementation for testing

use heapless::Vec;

use crate::platform::traits::RetainedInterface;

/// RAM-backed retained block
///
/// `reset_cold()` simulates a power loss: the block reports "never written"
/// again, exactly like real RTC memory after power-up.
#[derive(Debug, Default)]
pub struct MockRetained {
    data: Vec<u8, 64>,
    written: bool,
}

impl MockRetained {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a cold boot (power loss wipes retained memory)
    pub fn reset_cold(&mut self) {
        self.data.clear();
        self.written = false;
    }

    /// Corrupt a stored byte, for CRC tests
    pub fn corrupt(&mut self, offset: usize) {
        if let Some(byte) = self.data.get_mut(offset) {
            *byte ^= 0xA5;
        }
    }
}

impl RetainedInterface for MockRetained {
    fn load(&mut self, buf: &mut [u8]) -> bool {
        if !self.written || buf.len() > self.data.len() {
            return false;
        }
        buf.copy_from_slice(&self.data[..buf.len()]);
        true
    }

    fn store(&mut self, data: &[u8]) {
        self.data.clear();
        let _ = self.data.extend_from_slice(data);
        self.written = true;
    }
}
