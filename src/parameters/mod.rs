//! Settings structs and persistence
//!
//! Each component owns its settings value and mutates it directly; the
//! persistence layer sees only fixed-size byte images with a leading
//! checksum byte. The web configuration UI applies submitted form fields
//! through `apply_setting(name, value)` on each struct.

pub mod network;
pub mod store;
pub mod telemetry;

use bitflags::bitflags;

pub use network::{NetworkSettings, NETWORK_SETTINGS_SIZE};
pub use store::SettingsStore;
pub use telemetry::{
    CollectorSettings, QuerySettings, COLLECTOR_SETTINGS_SIZE, QUERY_SETTINGS_SIZE,
};

/// Flash offset of the network settings region (checksum byte + image)
pub const NETWORK_SETTINGS_OFFSET: u32 = 0;

/// Flash offset of the collector settings region
pub const COLLECTOR_SETTINGS_OFFSET: u32 = NETWORK_SETTINGS_OFFSET + NETWORK_SETTINGS_SIZE as u32 + 1;

/// Flash offset of the query client settings region
pub const QUERY_SETTINGS_OFFSET: u32 = COLLECTOR_SETTINGS_OFFSET + COLLECTOR_SETTINGS_SIZE as u32 + 1;

bitflags! {
    /// Per-field flags for the web configuration UI
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SettingFlags: u8 {
        /// Field value is never rendered back to the client (passwords)
        const HIDDEN = 0b0000_0001;
    }
}

/// Descriptor of one form field a settings struct exposes to the web UI
#[derive(Debug, Clone, Copy)]
pub struct SettingField {
    pub name: &'static str,
    pub flags: SettingFlags,
}

/// Copy a string into a fixed NUL-padded field of the byte image
pub(crate) fn write_str_field(buf: &mut [u8], value: &str) {
    buf.fill(0);
    let len = value.len().min(buf.len().saturating_sub(1));
    buf[..len].copy_from_slice(&value.as_bytes()[..len]);
}

/// Read a NUL-terminated string from a fixed field of the byte image
pub(crate) fn read_str_field<const N: usize>(buf: &[u8]) -> heapless::String<N> {
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let text = core::str::from_utf8(&buf[..len]).unwrap_or("");
    heapless::String::try_from(text).unwrap_or_default()
}
