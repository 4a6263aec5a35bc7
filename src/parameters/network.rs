//! Network settings
//!
//! Hostname, station credentials, and the quick-reconnect cache (channel +
//! BSSID of the last access point we associated with). The cache fields are
//! managed by the connection manager; everything else comes from the web
//! configuration UI or the build-time defaults.

use heapless::String;

use super::{read_str_field, write_str_field, SettingField, SettingFlags};

/// Maximum hostname length (also the RS-485 address and soft-AP SSID)
pub const MAX_HOSTNAME_LEN: usize = 63;

/// Maximum SSID length
pub const MAX_SSID_LEN: usize = 31;

/// Maximum WiFi password length
pub const MAX_PASSWORD_LEN: usize = 31;

/// Serialized image size: hostname 64 + ssid 32 + password 32 + channel 1 + bssid 6
pub const NETWORK_SETTINGS_SIZE: usize = 135;

/// Form fields this struct exposes to the web configuration UI
pub const NETWORK_SETTING_FIELDS: &[SettingField] = &[
    SettingField {
        name: "hostname",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ssid",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "password",
        flags: SettingFlags::HIDDEN,
    },
];

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Node hostname, 4 to 63 chars of letters, digits and '-'
    pub hostname: String<MAX_HOSTNAME_LEN>,
    /// WiFi network to connect to; empty means unconfigured
    pub ssid: String<MAX_SSID_LEN>,
    /// WiFi network password
    pub password: String<MAX_PASSWORD_LEN>,
    /// Cached radio channel, 0 when no cache is present
    pub wifi_channel: u8,
    /// Cached access point BSSID
    pub bssid: [u8; 6],
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            hostname: String::try_from(env!("NODE_HOSTNAME")).unwrap_or_default(),
            ssid: String::try_from(env!("WIFI_SSID")).unwrap_or_default(),
            password: String::try_from(env!("WIFI_PASSWORD")).unwrap_or_default(),
            wifi_channel: 0,
            bssid: [0; 6],
        }
    }
}

impl NetworkSettings {
    /// Whether a station network is configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }

    /// Whether a quick-reconnect cache is present
    pub fn has_reconnect_cache(&self) -> bool {
        self.wifi_channel != 0
    }

    /// Drop the quick-reconnect cache (stale-cache recovery)
    pub fn clear_reconnect_cache(&mut self) {
        self.wifi_channel = 0;
        self.bssid = [0; 6];
    }

    /// Apply one submitted form field; returns whether the value changed
    ///
    /// This is the `process_setting(name, dest, constraints)` seam of the
    /// web configuration collaborator: values violating a field's
    /// constraints are rejected without touching the current setting.
    pub fn apply_setting(&mut self, name: &str, value: &str) -> bool {
        match name {
            "hostname" => {
                if value.len() < 4
                    || value.len() > MAX_HOSTNAME_LEN
                    || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                {
                    return false;
                }
                replace(&mut self.hostname, value)
            }
            "ssid" => {
                if value.len() > MAX_SSID_LEN {
                    return false;
                }
                replace(&mut self.ssid, value)
            }
            "password" => {
                if value.len() > MAX_PASSWORD_LEN {
                    return false;
                }
                replace(&mut self.password, value)
            }
            _ => false,
        }
    }

    /// Serialize to the fixed on-flash image
    pub fn to_bytes(&self) -> [u8; NETWORK_SETTINGS_SIZE] {
        let mut image = [0u8; NETWORK_SETTINGS_SIZE];
        write_str_field(&mut image[0..64], &self.hostname);
        write_str_field(&mut image[64..96], &self.ssid);
        write_str_field(&mut image[96..128], &self.password);
        image[128] = self.wifi_channel;
        image[129..135].copy_from_slice(&self.bssid);
        image
    }

    /// Deserialize from the fixed on-flash image
    pub fn from_bytes(image: &[u8; NETWORK_SETTINGS_SIZE]) -> Self {
        let mut bssid = [0u8; 6];
        bssid.copy_from_slice(&image[129..135]);
        Self {
            hostname: read_str_field(&image[0..64]),
            ssid: read_str_field(&image[64..96]),
            password: read_str_field(&image[96..128]),
            wifi_channel: image[128],
            bssid,
        }
    }
}

fn replace<const N: usize>(dest: &mut String<N>, value: &str) -> bool {
    if dest.as_str() == value {
        return false;
    }
    if let Ok(new) = String::try_from(value) {
        *dest = new;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> NetworkSettings {
        let mut settings = NetworkSettings::default();
        settings.apply_setting("hostname", "node-01");
        settings.apply_setting("ssid", "HomeNet");
        settings.apply_setting("password", "secret123");
        settings
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut settings = configured();
        settings.wifi_channel = 11;
        settings.bssid = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01];

        let back = NetworkSettings::from_bytes(&settings.to_bytes());
        assert_eq!(back, settings);
    }

    #[test]
    fn test_hostname_constraints() {
        let mut settings = NetworkSettings::default();
        assert!(!settings.apply_setting("hostname", "abc")); // too short
        assert!(!settings.apply_setting("hostname", "has space"));
        assert!(settings.apply_setting("hostname", "node-01"));
        // Unchanged value reports no change
        assert!(!settings.apply_setting("hostname", "node-01"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut settings = NetworkSettings::default();
        assert!(!settings.apply_setting("nonsense", "value"));
    }

    #[test]
    fn test_password_field_is_hidden() {
        let password = NETWORK_SETTING_FIELDS
            .iter()
            .find(|f| f.name == "password")
            .unwrap();
        assert!(password.flags.contains(SettingFlags::HIDDEN));

        let ssid = NETWORK_SETTING_FIELDS.iter().find(|f| f.name == "ssid").unwrap();
        assert!(!ssid.flags.contains(SettingFlags::HIDDEN));
    }

    #[test]
    fn test_reconnect_cache_flags() {
        let mut settings = configured();
        assert!(!settings.has_reconnect_cache());

        settings.wifi_channel = 6;
        settings.bssid = [1; 6];
        assert!(settings.has_reconnect_cache());

        settings.clear_reconnect_cache();
        assert!(!settings.has_reconnect_cache());
        assert_eq!(settings.bssid, [0; 6]);
    }

    #[test]
    fn test_is_configured() {
        let mut settings = NetworkSettings::default();
        settings.ssid = String::new();
        assert!(!settings.is_configured());
        settings.apply_setting("ssid", "Net");
        assert!(settings.is_configured());
    }
}
