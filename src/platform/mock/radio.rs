//! Mock radio implementation for testing

use heapless::{String, Vec};

use crate::platform::traits::{ConnectHint, LinkInfo, RadioInterface};
use crate::platform::Result;

/// One recorded call to `start_connect`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAttempt {
    pub ssid: String<32>,
    pub hint: Option<ConnectHint>,
}

/// Mock radio with a scripted link
///
/// Tests drive the link state directly via [`MockRadio::set_link_up`]; the
/// radio records every association attempt, soft-AP start and power-down so
/// tests can assert on the exact sequence of radio operations.
#[derive(Debug, Default)]
pub struct MockRadio {
    station_mode: bool,
    link: Option<LinkInfo>,
    ap_ssid: Option<String<63>>,
    pub connect_attempts: Vec<ConnectAttempt, 8>,
    pub power_off_count: u32,
}

impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the link coming up with the given negotiated parameters
    pub fn set_link_up(&mut self, info: LinkInfo) {
        self.link = Some(info);
    }

    /// Simulate the link dropping
    pub fn set_link_down(&mut self) {
        self.link = None;
    }

    /// SSID of the running soft-AP, if any
    pub fn access_point_ssid(&self) -> Option<&str> {
        self.ap_ssid.as_deref()
    }

    /// Hint passed to the most recent association attempt
    pub fn last_hint(&self) -> Option<ConnectHint> {
        self.connect_attempts.last().and_then(|a| a.hint)
    }
}

impl RadioInterface for MockRadio {
    fn set_station_mode(&mut self) -> Result<()> {
        self.station_mode = true;
        self.ap_ssid = None;
        Ok(())
    }

    fn start_connect(
        &mut self,
        _hostname: &str,
        ssid: &str,
        _password: &str,
        hint: Option<ConnectHint>,
    ) -> Result<()> {
        self.link = None;
        let attempt = ConnectAttempt {
            ssid: String::try_from(ssid).unwrap_or_default(),
            hint,
        };
        // Oldest attempts are not interesting once the log is full
        if self.connect_attempts.is_full() {
            self.connect_attempts.remove(0);
        }
        let _ = self.connect_attempts.push(attempt);
        Ok(())
    }

    fn is_link_up(&self) -> bool {
        self.link.is_some()
    }

    fn link_info(&self) -> Option<LinkInfo> {
        self.link
    }

    fn start_access_point(&mut self, ssid: &str, _ip: [u8; 4], _netmask: [u8; 4]) -> Result<()> {
        self.station_mode = false;
        self.link = None;
        self.ap_ssid = Some(String::try_from(ssid).unwrap_or_default());
        Ok(())
    }

    fn power_off(&mut self) -> Result<()> {
        self.station_mode = false;
        self.link = None;
        self.ap_ssid = None;
        self.power_off_count += 1;
        Ok(())
    }
}
