//! Checksummed settings persistence
//!
//! Each settings region on flash is one checksum byte followed by the raw
//! struct image. The checksum is the sum of the image bytes starting from
//! seed 13, taken mod 256 - a bit-exact contract with the images already in
//! the field, so it stays hand-rolled rather than delegated to a CRC crate.
//!
//! A mismatch on load is not an error: the caller receives a zeroed image
//! and `valid = false`, resets to defaults and carries on. `poll()` writes
//! the region back whenever the live image has drifted from what was last
//! persisted, so callers mutate their settings freely and persistence
//! follows.

use crate::platform::traits::FlashInterface;
use crate::platform::Result;

/// Checksum seed, part of the on-flash contract
const CHECKSUM_SEED: u16 = 13;

/// Persistence driver for one fixed-size settings region
pub struct SettingsStore<const N: usize> {
    offset: u32,
    /// Checksum of the image as last seen on flash
    checksum: u8,
}

impl<const N: usize> SettingsStore<N> {
    /// Create a store for the region at `offset`
    pub fn new(offset: u32) -> Self {
        Self {
            offset,
            checksum: 0,
        }
    }

    /// Load the region
    ///
    /// Returns the stored image and whether its checksum was valid. On a
    /// mismatch the image is zeroed; the caller is expected to apply
    /// defaults and `save` them.
    pub fn load<F: FlashInterface>(&mut self, flash: &mut F) -> Result<([u8; N], bool)> {
        let mut stored = [0u8; 1];
        flash.read(self.offset, &mut stored)?;

        let mut image = [0u8; N];
        flash.read(self.offset + 1, &mut image)?;

        let valid = stored[0] == checksum(&image);
        if valid {
            crate::log_info!("Settings loaded successfully");
        } else {
            crate::log_warn!("Invalid settings checksum");
            image = [0u8; N];
        }
        self.checksum = checksum(&image);
        Ok((image, valid))
    }

    /// Write the image and its checksum
    pub fn save<F: FlashInterface>(&mut self, flash: &mut F, image: &[u8; N]) -> Result<()> {
        let sum = checksum(image);
        flash.write(self.offset, &[sum])?;
        flash.write(self.offset + 1, image)?;
        self.checksum = sum;
        Ok(())
    }

    /// Write-through on change
    ///
    /// Called every loop iteration with the live image; persists it only
    /// when it differs from the image last written.
    pub fn poll<F: FlashInterface>(&mut self, flash: &mut F, image: &[u8; N]) -> Result<()> {
        if checksum(image) != self.checksum {
            crate::log_info!("Writing settings to flash");
            self.save(flash, image)?;
        }
        Ok(())
    }
}

/// Sum-mod-256 checksum with seed 13
fn checksum(bytes: &[u8]) -> u8 {
    let mut sum = CHECKSUM_SEED;
    for &byte in bytes {
        sum = sum.wrapping_add(byte as u16);
    }
    (sum % 256) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockFlash;

    #[test]
    fn test_checksum_seed_and_wrap() {
        assert_eq!(checksum(&[]), 13);
        assert_eq!(checksum(&[1, 2]), 16);
        // 13 + 250 + 250 = 513 -> 513 % 256 = 1
        assert_eq!(checksum(&[250, 250]), 1);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut flash = MockFlash::new();
        let mut store = SettingsStore::<8>::new(0);

        let image = [1, 2, 3, 4, 5, 6, 7, 8];
        store.save(&mut flash, &image).unwrap();

        let mut store2 = SettingsStore::<8>::new(0);
        let (loaded, valid) = store2.load(&mut flash).unwrap();
        assert!(valid);
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_corruption_resets_to_zeroed() {
        let mut flash = MockFlash::new();
        let mut store = SettingsStore::<8>::new(0);
        store.save(&mut flash, &[9; 8]).unwrap();

        flash.corrupt(3); // inside the image

        let (loaded, valid) = store.load(&mut flash).unwrap();
        assert!(!valid);
        assert_eq!(loaded, [0; 8]);
    }

    #[test]
    fn test_unwritten_flash_is_invalid() {
        let mut flash = MockFlash::new();
        let mut store = SettingsStore::<8>::new(0);

        let (loaded, valid) = store.load(&mut flash).unwrap();
        assert!(!valid);
        assert_eq!(loaded, [0; 8]);
    }

    #[test]
    fn test_poll_writes_only_on_change() {
        let mut flash = MockFlash::new();
        let mut store = SettingsStore::<4>::new(16);

        let image = [1, 1, 1, 1];
        store.save(&mut flash, &image).unwrap();

        // Unchanged image: poll must not disturb the stored copy
        store.poll(&mut flash, &image).unwrap();

        // Changed image: poll persists it
        let changed = [1, 1, 1, 2];
        store.poll(&mut flash, &changed).unwrap();

        let (loaded, valid) = SettingsStore::<4>::new(16).load(&mut flash).unwrap();
        assert!(valid);
        assert_eq!(loaded, changed);
    }
}
