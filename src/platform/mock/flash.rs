//! Mock flash implementation for testing

use crate::platform::error::FlashError;
use crate::platform::traits::FlashInterface;
use crate::platform::Result;

/// Size of the simulated settings area
pub const MOCK_FLASH_SIZE: usize = 512;

/// RAM-backed settings area
#[derive(Debug)]
pub struct MockFlash {
    data: [u8; MOCK_FLASH_SIZE],
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFlash {
    pub fn new() -> Self {
        Self {
            data: [0xFF; MOCK_FLASH_SIZE],
        }
    }

    /// Corrupt a single byte, for checksum tests
    pub fn corrupt(&mut self, offset: usize) {
        self.data[offset] ^= 0xA5;
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<()> {
        let offset = offset as usize;
        let end = offset
            .checked_add(buf.len())
            .ok_or(FlashError::OutOfBounds)?;
        if end > MOCK_FLASH_SIZE {
            return Err(FlashError::OutOfBounds.into());
        }
        buf.copy_from_slice(&self.data[offset..end]);
        Ok(())
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        let offset = offset as usize;
        let end = offset
            .checked_add(data.len())
            .ok_or(FlashError::OutOfBounds)?;
        if end > MOCK_FLASH_SIZE {
            return Err(FlashError::OutOfBounds.into());
        }
        self.data[offset..end].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_roundtrip() {
        let mut flash = MockFlash::new();
        flash.write(16, &[1, 2, 3]).unwrap();

        let mut buf = [0u8; 3];
        flash.read(16, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut flash = MockFlash::new();
        let mut buf = [0u8; 8];
        assert!(flash.read(MOCK_FLASH_SIZE as u32 - 4, &mut buf).is_err());
    }
}
