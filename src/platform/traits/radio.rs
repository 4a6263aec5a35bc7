//! WiFi radio interface
//!
//! Station and soft-AP control for a single-radio board. Association is
//! asynchronous: [`RadioInterface::start_connect`] only begins the attempt,
//! and the connection manager polls [`RadioInterface::is_link_up`] until the
//! link comes up or its timeout expires.

use crate::platform::Result;

/// Cached association parameters for quick reconnect
///
/// Reusing the channel and BSSID observed during the previous successful
/// association lets the radio skip the full network scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectHint {
    /// Radio channel of the access point
    pub channel: u8,
    /// Hardware identifier (BSSID) of the access point
    pub bssid: [u8; 6],
}

/// Parameters negotiated during a successful association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkInfo {
    /// Negotiated radio channel
    pub channel: u8,
    /// BSSID of the access point we are associated with
    pub bssid: [u8; 6],
    /// Assigned IPv4 address
    pub ip: [u8; 4],
}

/// WiFi radio control
pub trait RadioInterface {
    /// Configure the radio as a station. No network activity yet.
    fn set_station_mode(&mut self) -> Result<()>;

    /// Begin an asynchronous association attempt
    ///
    /// With a [`ConnectHint`] the radio targets that access point directly,
    /// skipping the scan. An invalid hint still resolves against the correct
    /// SSID/password, only slower.
    fn start_connect(
        &mut self,
        hostname: &str,
        ssid: &str,
        password: &str,
        hint: Option<ConnectHint>,
    ) -> Result<()>;

    /// Whether the station link is currently established
    fn is_link_up(&self) -> bool;

    /// Negotiated link parameters, available once the link is up
    fn link_info(&self) -> Option<LinkInfo>;

    /// Start broadcasting a soft access point on a local subnet
    fn start_access_point(&mut self, ssid: &str, ip: [u8; 4], netmask: [u8; 4]) -> Result<()>;

    /// Power the radio down
    fn power_off(&mut self) -> Result<()>;
}
