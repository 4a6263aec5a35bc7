//! Flash settings-area interface
//!
//! EEPROM-style byte access to the persistent settings area. The checksummed
//! layout on top of this interface is defined by
//! [`SettingsStore`](crate::parameters::store::SettingsStore).

use crate::platform::Result;

/// Byte-addressed persistent settings storage
pub trait FlashInterface {
    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: u32, data: &[u8]) -> Result<()>;
}
